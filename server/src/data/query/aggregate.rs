//! Named aggregations over the joined record set
//!
//! Every function takes a slice of records (usually the output of
//! [`super::filter`]) and folds it into a small summary. Null totals
//! contribute nothing to a sum; null grouping keys collect into an
//! explicit null bucket rather than disappearing.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::data::snapshot::TicketRecord;

/// One group's summed revenue, as returned by [`top_n`]
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GroupTotal {
    /// Grouping key; `None` is the bucket for records missing the key
    pub key: Option<String>,
    /// Sum of `total` over the group
    pub total: f64,
}

/// Sum `total` per grouping key and return the `n` largest groups.
///
/// Ordering is deterministic: descending by sum, ties broken by key
/// (null bucket first, then ascending). `n == 0` yields an empty list.
pub fn top_n<'a, F>(records: &'a [TicketRecord], key_fn: F, n: usize) -> Vec<GroupTotal>
where
    F: Fn(&'a TicketRecord) -> Option<&'a str>,
{
    let mut sums: BTreeMap<Option<&str>, f64> = BTreeMap::new();
    for record in records {
        *sums.entry(key_fn(record)).or_insert(0.0) += record.total.unwrap_or(0.0);
    }

    // BTreeMap iteration gives the tie-break order; the stable sort
    // keeps it for equal sums.
    let mut groups: Vec<GroupTotal> = sums
        .into_iter()
        .map(|(key, total)| GroupTotal {
            key: key.map(str::to_string),
            total,
        })
        .collect();
    groups.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
    groups.truncate(n);
    groups
}

/// Sum revenue per calendar day of `purchase_time`, ascending by date.
///
/// Records with a null purchase time have no day to land in and are
/// skipped entirely.
pub fn daily_revenue(records: &[TicketRecord]) -> BTreeMap<NaiveDate, f64> {
    let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        if let Some(ts) = record.purchase_time {
            *days.entry(ts.date()).or_insert(0.0) += record.total.unwrap_or(0.0);
        }
    }
    days
}

/// Repeat-customer summary, as returned by [`repeat_customer_stats`]
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RepeatCustomerStats {
    /// Distinct customers with two or more tickets
    pub repeat_count: usize,
    /// Distinct customers overall
    pub total_customers: usize,
    /// `repeat_count / total_customers`, 0 when there are no customers
    pub ratio: f64,
}

/// Count distinct customers and how many of them bought more than once
pub fn repeat_customer_stats(records: &[TicketRecord]) -> RepeatCustomerStats {
    let mut tickets_per_customer: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *tickets_per_customer
            .entry(record.customer_id.as_str())
            .or_insert(0) += 1;
    }

    let total_customers = tickets_per_customer.len();
    let repeat_count = tickets_per_customer.values().filter(|&&n| n >= 2).count();
    let ratio = if total_customers == 0 {
        0.0
    } else {
        repeat_count as f64 / total_customers as f64
    };

    RepeatCustomerStats {
        repeat_count,
        total_customers,
        ratio,
    }
}
