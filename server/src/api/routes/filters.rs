//! Filtered record listing

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};

use crate::api::types::{ApiError, apply_limit, take_limit};
use crate::core::constants::DEFAULT_FILTER_LIMIT;
use crate::data::TicketRecord;
use crate::data::query::{FilterSpec, filter};

use super::QueryApiState;

/// List joined records matching the filter, in source order
///
/// An empty result is a successful response, not an error.
#[utoipa::path(
    get,
    path = "/api/v1/filter/data",
    tag = "filters",
    params(
        ("start_date" = Option<String>, Query, description = "Inclusive lower bound on purchase_time"),
        ("end_date" = Option<String>, Query, description = "Inclusive upper bound on purchase_time"),
        ("customers" = Option<String>, Query, description = "Comma-separated customer ids"),
        ("movies" = Option<String>, Query, description = "Comma-separated movie ids"),
        ("theaters" = Option<String>, Query, description = "Comma-separated theater ids"),
        ("seat_type" = Option<String>, Query, description = "Comma-separated seat types"),
        ("min_total" = Option<f64>, Query, description = "Inclusive lower bound on ticket total"),
        ("limit" = Option<usize>, Query, description = "Row cap (default 100, 0 = uncapped)")
    ),
    responses(
        (status = 200, description = "Matching records", body = [TicketRecord]),
        (status = 400, description = "Unknown filter field or invalid value")
    )
)]
pub async fn filter_data(
    State(state): State<QueryApiState>,
    Query(mut params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<TicketRecord>>, ApiError> {
    let limit = take_limit(&mut params, DEFAULT_FILTER_LIMIT)?;
    let spec = FilterSpec::from_params(&params)?;

    let snapshot = state.dataset.snapshot();
    let matched = filter(snapshot.records(), &spec);
    tracing::trace!(matches = matched.len(), limit, "Filter query evaluated");

    Ok(Json(apply_limit(matched, limit)))
}
