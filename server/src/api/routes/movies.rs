//! Movie revenue aggregation

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};

use crate::api::types::{ApiError, take_limit};
use crate::core::constants::DEFAULT_TOP_LIMIT;
use crate::data::query::{FilterSpec, GroupTotal, filter, top_n};

use super::QueryApiState;

/// Top movies by summed ticket revenue
///
/// Records whose movie id resolved to no title land in a null-keyed
/// group rather than vanishing from the totals.
#[utoipa::path(
    get,
    path = "/api/v1/movies/top",
    tag = "movies",
    params(
        ("start_date" = Option<String>, Query, description = "Inclusive lower bound on purchase_time"),
        ("end_date" = Option<String>, Query, description = "Inclusive upper bound on purchase_time"),
        ("customers" = Option<String>, Query, description = "Comma-separated customer ids"),
        ("movies" = Option<String>, Query, description = "Comma-separated movie ids"),
        ("theaters" = Option<String>, Query, description = "Comma-separated theater ids"),
        ("seat_type" = Option<String>, Query, description = "Comma-separated seat types"),
        ("min_total" = Option<f64>, Query, description = "Inclusive lower bound on ticket total"),
        ("limit" = Option<usize>, Query, description = "Number of groups to return (default 5)")
    ),
    responses(
        (status = 200, description = "Movie groups, descending by revenue", body = [GroupTotal]),
        (status = 400, description = "Unknown filter field or invalid value")
    )
)]
pub async fn top_movies(
    State(state): State<QueryApiState>,
    Query(mut params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<GroupTotal>>, ApiError> {
    let limit = take_limit(&mut params, DEFAULT_TOP_LIMIT)?;
    let spec = FilterSpec::from_params(&params)?;

    let snapshot = state.dataset.snapshot();
    let matched = filter(snapshot.records(), &spec);
    Ok(Json(top_n(&matched, |r| r.title.as_deref(), limit)))
}
