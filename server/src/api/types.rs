//! Shared API types
//!
//! Common types used across all API endpoints, including the error
//! response shape and query-parameter helpers.

use std::collections::HashMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::data::query::QueryError;

/// Standard API error response
///
/// This API is read-only over an in-memory snapshot, so the only
/// failures it can produce are malformed queries and unknown routes.
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::InvalidField(_) => Self::bad_request("INVALID_FILTER_FIELD", e.to_string()),
            QueryError::InvalidValue { .. } => {
                Self::bad_request("INVALID_FILTER_VALUE", e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

/// Pull the `limit` parameter out of the raw query map, leaving only
/// filter fields behind.
///
/// A missing `limit` falls back to the endpoint's documented default.
/// What the value means is the caller's business: the record listing
/// treats 0 as "no cap" (see [`apply_limit`]), while the top-N
/// endpoints pass it through as the group count, where 0 yields no
/// groups.
pub fn take_limit(
    params: &mut HashMap<String, String>,
    default: usize,
) -> Result<usize, ApiError> {
    match params.remove("limit") {
        Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
            ApiError::bad_request(
                "INVALID_LIMIT",
                format!("Invalid value for parameter 'limit': {}", raw),
            )
        }),
        None => Ok(default),
    }
}

/// Apply an explicit row cap; `limit == 0` means unbounded
pub fn apply_limit<T>(mut rows: Vec<T>, limit: usize) -> Vec<T> {
    if limit > 0 {
        rows.truncate(limit);
    }
    rows
}
