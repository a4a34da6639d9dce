//! Error types for labware-wrangler
//!
//! `WranglerError` is the error taxonomy of a wrangling pass. Only submission
//! failures are recovered inside a run; everything else aborts it.
//! `ApiError` maps those errors onto HTTP responses.

use crate::models::EntityKind;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors raised while wrangling
#[derive(Debug, Error)]
pub enum WranglerError {
    /// Container rows match neither the plate nor the tube rack shape
    #[error("Unrecognized labware type for container {barcode}")]
    UnrecognizedLabware { barcode: String },

    /// A study or purpose name has no known identifier
    #[error("No {kind} uuid found for '{name}'")]
    UnresolvedReference { kind: EntityKind, name: String },

    /// The reference backend could not be queried or answered nonsense
    #[error("Reference lookup failed: {0}")]
    ReferenceLookup(String),

    /// Registration service did not report the labware as created
    #[error("Submission of {barcode} failed: {body}")]
    SubmissionFailed {
        barcode: String,
        status: Option<u16>,
        body: String,
    },

    /// No warehouse rows for a barcode
    #[error("Not found: {0}")]
    NotFound(String),

    /// Warehouse read/write or configuration failure
    #[error(transparent)]
    Store(#[from] wrangler_common::Error),
}

/// Result type for wrangling operations
pub type WranglerResult<T> = Result<T, WranglerError>;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Request understood but the labware cannot be processed (422)
    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    /// Registration service rejected the labware (502)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Conflict (409) - a run is already in progress
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<WranglerError> for ApiError {
    fn from(err: WranglerError) -> Self {
        match err {
            WranglerError::NotFound(msg) => ApiError::NotFound(msg),
            WranglerError::UnrecognizedLabware { .. }
            | WranglerError::UnresolvedReference { .. } => ApiError::Unprocessable(err.to_string()),
            WranglerError::SubmissionFailed { body, .. } => ApiError::Upstream(body),
            WranglerError::ReferenceLookup(msg) => ApiError::Upstream(msg),
            WranglerError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Unprocessable(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE", msg)
            }
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg,
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
