//! Health check endpoint

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::QueryApiState;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok`, or `empty` when the current snapshot holds no records
    pub status: &'static str,
    pub version: &'static str,
    /// Joined records in the current snapshot
    pub records: usize,
    /// When the current snapshot was built
    pub loaded_at: DateTime<Utc>,
}

/// Service health and current snapshot vitals
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up, with snapshot vitals", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<QueryApiState>) -> (StatusCode, Json<HealthResponse>) {
    let snapshot = state.dataset.snapshot();
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: if snapshot.is_empty() { "empty" } else { "ok" },
            version: env!("CARGO_PKG_VERSION"),
            records: snapshot.len(),
            loaded_at: snapshot.loaded_at(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::tests::fixture_state;
    use crate::core::config::DatasetConfig;
    use crate::data::DatasetService;
    use crate::data::loader::tests::write_fixture_dataset;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_reports_snapshot_vitals() {
        let (state, _dir) = fixture_state();
        let before = Utc::now();

        let (status, Json(resp)) = health(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(resp.records, 5);
        assert!(resp.loaded_at <= Utc::now() && resp.loaded_at >= before - chrono::Duration::minutes(1));
    }

    #[tokio::test]
    async fn test_health_flags_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dataset(dir.path());
        std::fs::write(
            dir.path().join("tickets.csv"),
            "ticket_id,movie_id,theater_id,show_id,customer_id,seat_type,total,purchase_time\n",
        )
        .unwrap();
        let dataset = Arc::new(
            DatasetService::init(DatasetConfig {
                dir: dir.path().to_path_buf(),
                reload_secs: 0,
            })
            .unwrap(),
        );

        let (_, Json(resp)) = health(State(QueryApiState { dataset })).await;
        assert_eq!(resp.status, "empty");
        assert_eq!(resp.records, 0);
    }
}
