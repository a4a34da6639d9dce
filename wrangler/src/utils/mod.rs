//! Utility modules for labware-wrangler

pub mod retry;

pub use retry::retry_with_backoff;
