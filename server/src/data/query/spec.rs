//! Filter specification: independent, optional predicates composed with AND

use std::collections::HashMap;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::data::loader::parse_timestamp;
use crate::data::snapshot::TicketRecord;

/// Errors raised while building a filter specification
///
/// The engine never recovers from a malformed spec by guessing; it
/// reports the specific invalid field to the caller.
#[derive(Error, Debug, PartialEq)]
pub enum QueryError {
    /// The spec references a field that is not part of the snapshot schema
    #[error("Unknown filter field: {0}")]
    InvalidField(String),

    /// A bound could not be parsed (bad date or number)
    #[error("Invalid value for filter field '{field}': {value}")]
    InvalidValue { field: &'static str, value: String },
}

impl QueryError {
    fn invalid_value(field: &'static str, value: &str) -> Self {
        Self::InvalidValue {
            field,
            value: value.to_string(),
        }
    }
}

/// Query parameters the engine understands; anything else is rejected
/// with [`QueryError::InvalidField`] rather than silently skipped.
const KNOWN_FIELDS: &[&str] = &[
    "start_date",
    "end_date",
    "customers",
    "movies",
    "theaters",
    "seat_type",
    "min_total",
];

/// A set of independent, optional predicates applied conjunctively.
///
/// An absent field means "no constraint on this dimension"; an empty
/// identifier list is treated the same way. Identifier lists are
/// normalized (trim + lowercase) at construction so every membership
/// test uses one comparison rule.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FilterSpec {
    /// Inclusive lower bound on purchase_time
    pub date_start: Option<NaiveDateTime>,
    /// Inclusive upper bound on purchase_time
    pub date_end: Option<NaiveDateTime>,
    pub customer_ids: Option<Vec<String>>,
    pub movie_ids: Option<Vec<String>>,
    pub theater_ids: Option<Vec<String>>,
    pub seat_types: Option<Vec<String>>,
    /// Inclusive lower bound on total
    pub min_total: Option<f64>,
}

/// Normalization rule shared by list construction and membership tests
fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Split a comma-separated identifier list, normalizing each entry.
/// An empty result maps to "constraint absent".
fn parse_id_list(raw: &str) -> Option<Vec<String>> {
    let ids: Vec<String> = raw
        .split(',')
        .map(normalize)
        .filter(|s| !s.is_empty())
        .collect();
    if ids.is_empty() { None } else { Some(ids) }
}

fn parse_date_bound(field: &'static str, raw: &str) -> Result<NaiveDateTime, QueryError> {
    parse_timestamp(raw).ok_or_else(|| QueryError::invalid_value(field, raw))
}

impl FilterSpec {
    /// Build a spec from query-string pairs.
    ///
    /// Unknown keys yield [`QueryError::InvalidField`]; unparseable date
    /// or numeric bounds yield [`QueryError::InvalidValue`]. Blank
    /// values mean the constraint is absent.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, QueryError> {
        if let Some(unknown) = params.keys().find(|k| !KNOWN_FIELDS.contains(&k.as_str())) {
            return Err(QueryError::InvalidField(unknown.clone()));
        }

        let mut spec = Self::default();

        for (key, value) in params {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                "start_date" => spec.date_start = Some(parse_date_bound("start_date", value)?),
                "end_date" => spec.date_end = Some(parse_date_bound("end_date", value)?),
                "customers" => spec.customer_ids = parse_id_list(value),
                "movies" => spec.movie_ids = parse_id_list(value),
                "theaters" => spec.theater_ids = parse_id_list(value),
                "seat_type" => spec.seat_types = parse_id_list(value),
                "min_total" => {
                    let min = value
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .ok_or_else(|| QueryError::invalid_value("min_total", value))?;
                    spec.min_total = Some(min);
                }
                _ => unreachable!("unknown keys rejected above"),
            }
        }

        Ok(spec)
    }

    /// Whether any constraint is active
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether a record satisfies every active predicate
    pub fn matches(&self, record: &TicketRecord) -> bool {
        // Null purchase_time never matches a date bound
        if let Some(start) = self.date_start {
            match record.purchase_time {
                Some(ts) if ts >= start => {}
                _ => return false,
            }
        }
        if let Some(end) = self.date_end {
            match record.purchase_time {
                Some(ts) if ts <= end => {}
                _ => return false,
            }
        }

        if !matches_id_list(&self.customer_ids, &record.customer_id) {
            return false;
        }
        if !matches_id_list(&self.movie_ids, &record.movie_id) {
            return false;
        }
        if !matches_id_list(&self.theater_ids, &record.theater_id) {
            return false;
        }
        if !matches_id_list(&self.seat_types, &record.seat_type) {
            return false;
        }

        // Null total never matches the lower bound
        if let Some(min) = self.min_total {
            match record.total {
                Some(total) if total >= min => {}
                _ => return false,
            }
        }

        true
    }
}

fn matches_id_list(list: &Option<Vec<String>>, value: &str) -> bool {
    match list {
        Some(ids) => ids.iter().any(|id| *id == normalize(value)),
        None => true,
    }
}

/// Apply the spec to a record set; the result preserves source order
/// and carries no implicit row cap (truncation is the caller's,
/// explicitly parameterized, concern).
pub fn filter(records: &[TicketRecord], spec: &FilterSpec) -> Vec<TicketRecord> {
    records
        .iter()
        .filter(|r| spec.matches(r))
        .cloned()
        .collect()
}
