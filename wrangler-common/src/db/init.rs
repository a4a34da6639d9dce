//! Warehouse database initialization
//!
//! The production warehouse schema is owned elsewhere. `create_warehouse_table`
//! only exists so that local runs and tests can stand up a table with the
//! columns the wrangler consumes.

use crate::config::TableName;
use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

/// Columns the wrangler reads, in select order
pub const WAREHOUSE_COLUMNS: &str = "id, container_barcode, destination, study, \
     supplier_sample_id, well_coordinate, tube_barcode, tube_position, wrangled";

/// Open a connection pool against the warehouse
pub async fn init_warehouse_pool(database_url: &str) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    // Writes and the scan may overlap with other warehouse clients
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    info!("Connected to warehouse");
    Ok(pool)
}

/// Create the warehouse extraction table if it does not exist
pub async fn create_warehouse_table(pool: &SqlitePool, table: &TableName) -> Result<()> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            container_barcode TEXT NOT NULL,
            destination TEXT NOT NULL,
            study TEXT NOT NULL,
            supplier_sample_id TEXT,
            well_coordinate TEXT,
            tube_barcode TEXT,
            tube_position TEXT,
            wrangled TIMESTAMP
        )
        "#,
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS idx_{index}_unwrangled \
         ON {table} (destination, wrangled, container_barcode)",
        index = table.as_str().replace('.', "_"),
    ))
    .execute(pool)
    .await?;

    info!("Warehouse table ready: {}", table);
    Ok(())
}
