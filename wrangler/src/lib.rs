//! labware-wrangler library interface
//!
//! Exposes the wrangling pipeline, its collaborators and the HTTP router so
//! that the binary and the integration tests share one wiring.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod utils;

pub use crate::error::{ApiError, ApiResult, WranglerError, WranglerResult};

use axum::Router;
use chrono::{DateTime, Utc};
use scheduler::RunLock;
use services::ContainerWrangler;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Single-barcode lookup and wrangle
    pub wrangler: ContainerWrangler,
    /// Shared with the scheduler so HTTP wrangles never overlap a batch run
    pub run_lock: RunLock,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(wrangler: ContainerWrangler, run_lock: RunLock) -> Self {
        Self {
            wrangler,
            run_lock,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::labware_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
