//! API route handlers

pub mod customers;
pub mod filters;
pub mod health;
pub mod movies;
pub mod revenue;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::data::DatasetService;

/// Shared state for the query endpoints
#[derive(Clone)]
pub struct QueryApiState {
    pub dataset: Arc<DatasetService>,
}

/// Build the query routes (mounted under `/api/v1`)
pub fn routes(dataset: Arc<DatasetService>) -> Router<()> {
    let state = QueryApiState { dataset };

    Router::new()
        .route("/health", get(health::health))
        .route("/filter/data", get(filters::filter_data))
        .route("/movies/top", get(movies::top_movies))
        .route("/customers/top", get(customers::top_customers))
        .route("/customers/repeat", get(customers::repeat_customers))
        .route("/revenue/daily", get(revenue::daily_revenue))
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::config::DatasetConfig;
    use crate::data::loader::tests::write_fixture_dataset;

    /// Build a state backed by the standard five-ticket fixture.
    /// Returns the tempdir so it outlives the test body.
    pub(crate) fn fixture_state() -> (QueryApiState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dataset(dir.path());
        let dataset = Arc::new(
            DatasetService::init(DatasetConfig {
                dir: dir.path().to_path_buf(),
                reload_secs: 0,
            })
            .unwrap(),
        );
        (QueryApiState { dataset }, dir)
    }
}
