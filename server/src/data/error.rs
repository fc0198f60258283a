//! Unified error type for the data layer

use thiserror::Error;

/// A source relation could not be read.
///
/// Fatal to the whole load: a load either produces a complete snapshot
/// or fails as a whole, there is no partial-snapshot error state.
#[derive(Error, Debug)]
#[error("Source relation '{relation}' is unavailable: {reason}")]
pub struct DataError {
    pub relation: &'static str,
    pub reason: String,
}

impl DataError {
    /// Create a source-unavailable error with preserved context
    pub fn source_unavailable(relation: &'static str, reason: impl ToString) -> Self {
        Self {
            relation,
            reason: reason.to_string(),
        }
    }
}
