//! Warehouse access for the wrangler
//!
//! The orchestrator only sees the `WarehouseStore` trait; `SqlWarehouse` is
//! the sqlx-backed implementation.

pub mod warehouse;

pub use warehouse::SqlWarehouse;

use crate::models::ContainerRow;
use async_trait::async_trait;
use wrangler_common::{Result, TableName};

/// Read and write access to the warehouse extraction table
///
/// "Unwrangled" means `wrangled IS NULL`; fetch and mark use the same column
/// so a marked container never comes back from a later scan.
#[async_trait]
pub trait WarehouseStore: Send + Sync {
    /// Unwrangled rows for a destination, ordered by container barcode
    async fn fetch_unwrangled(&self, table: &TableName, destination: &str)
        -> Result<Vec<ContainerRow>>;

    /// Set the wrangled marker on every row of the given containers
    ///
    /// Runs as one statement in one transaction. Returns the number of rows
    /// newly marked; already-marked rows are left untouched.
    async fn mark_wrangled(&self, table: &TableName, barcodes: &[String]) -> Result<u64>;

    /// All rows of one container regardless of marker state
    async fn fetch_container(&self, table: &TableName, barcode: &str) -> Result<Vec<ContainerRow>>;
}
