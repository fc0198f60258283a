//! Data layer: dataset loading, the immutable snapshot, and the query engine

pub mod dataset;
pub mod error;
pub mod loader;
pub mod query;
pub mod snapshot;

pub use dataset::DatasetService;
pub use error::DataError;
pub use snapshot::{Snapshot, TicketRecord};
