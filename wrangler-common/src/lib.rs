//! # Labware Wrangler Common Library
//!
//! Shared code for the labware wrangler service and its tooling:
//! - Configuration loading (TOML + environment + compiled defaults)
//! - Warehouse connection pool and schema bootstrap
//! - Common error type

pub mod config;
pub mod db;
pub mod error;

pub use config::{TableName, TomlConfig, UnrecognizedLabwarePolicy};
pub use error::{Error, Result};
