//! Immutable snapshot of the joined dataset

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// One denormalized row: a ticket left-joined with its movie, theater,
/// show start time, and customer.
///
/// Join misses leave the borrowed fields `None`; the ticket row itself
/// always survives. `total` and the timestamps are `None` when the
/// source value failed permissive parsing.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TicketRecord {
    pub ticket_id: String,
    pub movie_id: String,
    pub theater_id: String,
    pub show_id: String,
    pub customer_id: String,
    pub seat_type: String,
    pub total: Option<f64>,
    pub purchase_time: Option<NaiveDateTime>,
    /// Movie title (from the movies relation)
    pub title: Option<String>,
    /// Theater name (from the theaters relation)
    pub theater_name: Option<String>,
    /// Show start time (from the shows relation)
    pub start_time: Option<NaiveDateTime>,
    /// Customer name (from the customers relation)
    pub customer_name: Option<String>,
}

/// Point-in-time materialization of the joined dataset.
///
/// Immutable once built: readers hold `Arc<Snapshot>` clones and never
/// observe a partially-updated dataset. Replacing the current snapshot
/// is a pointer swap in [`crate::data::DatasetService`].
#[derive(Debug)]
pub struct Snapshot {
    records: Vec<TicketRecord>,
    loaded_at: DateTime<Utc>,
}

impl Snapshot {
    pub(crate) fn new(records: Vec<TicketRecord>) -> Self {
        Self {
            records,
            loaded_at: Utc::now(),
        }
    }

    /// Joined records in source order (one per ticket)
    pub fn records(&self) -> &[TicketRecord] {
        &self.records
    }

    /// Number of joined records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// When this snapshot was built
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}
