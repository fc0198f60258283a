//! Daily revenue aggregation

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};

use crate::api::types::ApiError;
use crate::data::query::{self, FilterSpec, filter};

use super::QueryApiState;

/// Revenue summed per calendar day of purchase, ascending by date
///
/// Keys are ISO dates (`YYYY-MM-DD`); records without a purchase time
/// appear in no bucket.
#[utoipa::path(
    get,
    path = "/api/v1/revenue/daily",
    tag = "revenue",
    params(
        ("start_date" = Option<String>, Query, description = "Inclusive lower bound on purchase_time"),
        ("end_date" = Option<String>, Query, description = "Inclusive upper bound on purchase_time"),
        ("customers" = Option<String>, Query, description = "Comma-separated customer ids"),
        ("movies" = Option<String>, Query, description = "Comma-separated movie ids"),
        ("theaters" = Option<String>, Query, description = "Comma-separated theater ids"),
        ("seat_type" = Option<String>, Query, description = "Comma-separated seat types"),
        ("min_total" = Option<f64>, Query, description = "Inclusive lower bound on ticket total")
    ),
    responses(
        (status = 200, description = "Map of ISO date to summed revenue", body = Object),
        (status = 400, description = "Unknown filter field or invalid value")
    )
)]
pub async fn daily_revenue(
    State(state): State<QueryApiState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Map<String, serde_json::Value>>, ApiError> {
    let spec = FilterSpec::from_params(&params)?;

    let snapshot = state.dataset.snapshot();
    let matched = filter(snapshot.records(), &spec);

    // serde_json's map preserves insertion order, so the ascending
    // BTreeMap order survives serialization.
    let days: serde_json::Map<String, serde_json::Value> = query::daily_revenue(&matched)
        .into_iter()
        .map(|(date, sum)| (date.to_string(), serde_json::json!(sum)))
        .collect();
    Ok(Json(days))
}
