//! Dataset loader: CSV ingestion, join, and column normalization
//!
//! Reads the five source relations and joins them into one denormalized
//! table, left-outer from the ticket side. The load either yields a
//! complete [`Snapshot`] or fails with [`DataError::SourceUnavailable`];
//! a half-built snapshot would silently corrupt every downstream
//! aggregate.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::core::constants::{
    CUSTOMERS_FILE, MOVIES_FILE, SHOWS_FILE, THEATERS_FILE, TICKETS_FILE,
};
use super::error::DataError;
use super::snapshot::{Snapshot, TicketRecord};

// =============================================================================
// Raw relation rows (CSV deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct TicketRow {
    ticket_id: String,
    movie_id: String,
    theater_id: String,
    show_id: String,
    customer_id: String,
    seat_type: String,
    #[serde(default)]
    total: String,
    #[serde(default)]
    purchase_time: String,
}

#[derive(Debug, Deserialize)]
struct MovieRow {
    movie_id: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct TheaterRow {
    theater_id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ShowRow {
    show_id: String,
    #[serde(default)]
    start_time: String,
    // movie_id and theater_id are present in the relation but the join
    // only borrows start_time
}

#[derive(Debug, Deserialize)]
struct CustomerRow {
    customer_id: String,
    name: String,
}

// =============================================================================
// Permissive column normalization
// =============================================================================

/// Accepted timestamp layouts, tried in order
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a timestamp permissively: malformed values become `None`,
/// never an error. Offsets (RFC 3339) keep their clock-face value; the
/// dataset is treated as a single local timeline with no conversion.
pub(crate) fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }

    // Bare dates bucket at midnight
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a decimal amount permissively: non-numeric values become `None`
pub(crate) fn parse_total(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

// =============================================================================
// Load
// =============================================================================

/// Read one relation; any structural failure (missing file, unreadable,
/// malformed CSV) fails the whole load
fn read_relation<T: DeserializeOwned>(
    dir: &Path,
    file: &str,
    relation: &'static str,
) -> Result<Vec<T>, DataError> {
    let path = dir.join(file);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&path)
        .map_err(|e| DataError::source_unavailable(relation, e))?;

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row.map_err(|e| DataError::source_unavailable(relation, e))?);
    }

    tracing::debug!(relation, rows = rows.len(), "Relation loaded");
    Ok(rows)
}

/// Load the five relations from `dir` and build a snapshot.
///
/// Joins movies, theaters, shows (start_time only), and customers onto
/// tickets, all left-outer from the ticket side: exactly one output row
/// per ticket, regardless of referential gaps. Temporal and numeric
/// columns are normalized after the join with permissive failure.
pub fn load(dir: &Path) -> Result<Snapshot, DataError> {
    let tickets: Vec<TicketRow> = read_relation(dir, TICKETS_FILE, "tickets")?;
    let movies: Vec<MovieRow> = read_relation(dir, MOVIES_FILE, "movies")?;
    let theaters: Vec<TheaterRow> = read_relation(dir, THEATERS_FILE, "theaters")?;
    let shows: Vec<ShowRow> = read_relation(dir, SHOWS_FILE, "shows")?;
    let customers: Vec<CustomerRow> = read_relation(dir, CUSTOMERS_FILE, "customers")?;

    let titles: HashMap<&str, &str> = movies
        .iter()
        .map(|m| (m.movie_id.as_str(), m.title.as_str()))
        .collect();
    let theater_names: HashMap<&str, &str> = theaters
        .iter()
        .map(|t| (t.theater_id.as_str(), t.name.as_str()))
        .collect();
    let start_times: HashMap<&str, &str> = shows
        .iter()
        .map(|s| (s.show_id.as_str(), s.start_time.as_str()))
        .collect();
    let customer_names: HashMap<&str, &str> = customers
        .iter()
        .map(|c| (c.customer_id.as_str(), c.name.as_str()))
        .collect();

    let records: Vec<TicketRecord> = tickets
        .into_iter()
        .map(|t| TicketRecord {
            total: parse_total(&t.total),
            purchase_time: parse_timestamp(&t.purchase_time),
            title: titles.get(t.movie_id.as_str()).map(|s| s.to_string()),
            theater_name: theater_names
                .get(t.theater_id.as_str())
                .map(|s| s.to_string()),
            start_time: start_times
                .get(t.show_id.as_str())
                .and_then(|s| parse_timestamp(s)),
            customer_name: customer_names
                .get(t.customer_id.as_str())
                .map(|s| s.to_string()),
            ticket_id: t.ticket_id,
            movie_id: t.movie_id,
            theater_id: t.theater_id,
            show_id: t.show_id,
            customer_id: t.customer_id,
            seat_type: t.seat_type,
        })
        .collect();

    tracing::debug!(records = records.len(), "Snapshot built");
    Ok(Snapshot::new(records))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    pub(crate) fn write_fixture_dataset(dir: &Path) {
        fs::write(
            dir.join(TICKETS_FILE),
            "ticket_id,movie_id,theater_id,show_id,customer_id,seat_type,total,purchase_time\n\
             t1,m1,th1,s1,c1,standard,10.0,2024-01-01 18:00:00\n\
             t2,m1,th1,s1,c1,vip,20.0,2024-01-01 21:00:00\n\
             t3,m1,th2,s2,c2,standard,30.0,2024-01-02 18:00:00\n\
             t4,m2,th2,s3,c3,standard,5.0,2024-01-02 20:00:00\n\
             t5,m2,th1,s3,c2,standard,5.0,not-a-date\n",
        )
        .unwrap();
        fs::write(
            dir.join(MOVIES_FILE),
            "movie_id,title\nm1,Alpha\nm2,Beta\n",
        )
        .unwrap();
        fs::write(
            dir.join(THEATERS_FILE),
            "theater_id,name\nth1,Central\nth2,Harbor\n",
        )
        .unwrap();
        fs::write(
            dir.join(SHOWS_FILE),
            "show_id,movie_id,theater_id,start_time\n\
             s1,m1,th1,2024-01-01 19:00:00\n\
             s2,m1,th2,2024-01-02 19:00:00\n\
             s3,m2,th2,2024-01-02 21:00:00\n",
        )
        .unwrap();
        fs::write(
            dir.join(CUSTOMERS_FILE),
            "customer_id,name\nc1,Alice\nc2,Bob\nc3,Cara\n",
        )
        .unwrap();
    }

    fn load_fixture() -> Snapshot {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dataset(dir.path());
        load(dir.path()).unwrap()
    }

    #[test]
    fn test_one_record_per_ticket() {
        let snapshot = load_fixture();
        assert_eq!(snapshot.len(), 5);
        let ids: Vec<&str> = snapshot
            .records()
            .iter()
            .map(|r| r.ticket_id.as_str())
            .collect();
        // Source order is preserved
        assert_eq!(ids, vec!["t1", "t2", "t3", "t4", "t5"]);
    }

    #[test]
    fn test_join_fills_borrowed_columns() {
        let snapshot = load_fixture();
        let first = &snapshot.records()[0];
        assert_eq!(first.title.as_deref(), Some("Alpha"));
        assert_eq!(first.theater_name.as_deref(), Some("Central"));
        assert_eq!(first.customer_name.as_deref(), Some("Alice"));
        assert_eq!(
            first.start_time,
            parse_timestamp("2024-01-01 19:00:00")
        );
    }

    #[test]
    fn test_left_join_keeps_tickets_with_missing_references() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dataset(dir.path());
        // A ticket pointing at ids that exist in no other relation
        fs::write(
            dir.path().join(TICKETS_FILE),
            "ticket_id,movie_id,theater_id,show_id,customer_id,seat_type,total,purchase_time\n\
             t1,ghost,ghost,ghost,ghost,standard,12.5,2024-01-01 18:00:00\n",
        )
        .unwrap();

        let snapshot = load(dir.path()).unwrap();
        assert_eq!(snapshot.len(), 1);
        let r = &snapshot.records()[0];
        assert_eq!(r.title, None);
        assert_eq!(r.theater_name, None);
        assert_eq!(r.start_time, None);
        assert_eq!(r.customer_name, None);
        assert_eq!(r.total, Some(12.5));
    }

    #[test]
    fn test_malformed_values_coerce_to_none() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dataset(dir.path());
        fs::write(
            dir.path().join(TICKETS_FILE),
            "ticket_id,movie_id,theater_id,show_id,customer_id,seat_type,total,purchase_time\n\
             t1,m1,th1,s1,c1,standard,abc,garbage\n\
             t2,m1,th1,s1,c1,standard,,\n",
        )
        .unwrap();

        let snapshot = load(dir.path()).unwrap();
        for r in snapshot.records() {
            assert_eq!(r.total, None);
            assert_eq!(r.purchase_time, None);
        }
    }

    #[test]
    fn test_missing_relation_fails_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dataset(dir.path());
        fs::remove_file(dir.path().join(MOVIES_FILE)).unwrap();

        let err = load(dir.path()).unwrap_err();
        assert_eq!(err.relation, "movies");
    }

    #[test]
    fn test_structurally_invalid_relation_fails_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dataset(dir.path());
        // Header lacks the required columns entirely
        fs::write(dir.path().join(CUSTOMERS_FILE), "wrong,header\na,b\n").unwrap();

        let err = load(dir.path()).unwrap_err();
        assert_eq!(err.relation, "customers");
    }

    #[test]
    fn test_missing_dataset_dir() {
        let err = load(&PathBuf::from("/nonexistent/marquee-data")).unwrap_err();
        assert_eq!(err.relation, "tickets");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-01-01 18:30:00").is_some());
        assert!(parse_timestamp("2024-01-01T18:30:00").is_some());
        assert!(parse_timestamp("2024-01-01T18:30:00.250").is_some());
        assert!(parse_timestamp("2024-01-01T18:30:00+02:00").is_some());
        assert_eq!(
            parse_timestamp("2024-01-01"),
            NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_parse_total() {
        assert_eq!(parse_total("12.5"), Some(12.5));
        assert_eq!(parse_total(" 7 "), Some(7.0));
        assert_eq!(parse_total(""), None);
        assert_eq!(parse_total("free"), None);
        assert_eq!(parse_total("NaN"), None);
    }
}
