//! Single-barcode labware endpoints
//!
//! - `GET /labware/:barcode` - warehouse rows and classification
//! - `POST /wrangle/:barcode` - register one container and mark it wrangled

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::services::ContainerLookup;
use crate::AppState;

/// Response for a successful single wrangle
#[derive(Debug, Serialize)]
pub struct WrangleResponse {
    pub barcode: String,
    pub status: u16,
    /// Raw body returned by the registration service
    pub response: String,
}

/// GET /labware/:barcode
pub async fn get_labware(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> ApiResult<Json<ContainerLookup>> {
    let lookup = state.wrangler.lookup(&barcode).await?;
    Ok(Json(lookup))
}

/// POST /wrangle/:barcode
///
/// Refuses with 409 while a batch run holds the run lock.
pub async fn wrangle_labware(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> ApiResult<(StatusCode, Json<WrangleResponse>)> {
    let _guard = state
        .run_lock
        .try_lock()
        .map_err(|_| ApiError::Conflict("A wrangling run is in progress".to_string()))?;

    tracing::debug!(barcode = %barcode, "Single wrangle requested");

    let response = state.wrangler.wrangle(&barcode).await?;

    Ok((
        StatusCode::CREATED,
        Json(WrangleResponse {
            barcode,
            status: response.status,
            response: response.body,
        }),
    ))
}

/// Build labware routes
pub fn labware_routes() -> Router<AppState> {
    Router::new()
        .route("/labware/:barcode", get(get_labware))
        .route("/wrangle/:barcode", post(wrangle_labware))
}
