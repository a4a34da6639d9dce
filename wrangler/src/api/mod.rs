//! HTTP API handlers for labware-wrangler

pub mod health;
pub mod labware;

pub use health::health_routes;
pub use labware::labware_routes;
