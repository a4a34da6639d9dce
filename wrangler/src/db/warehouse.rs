//! sqlx-backed warehouse store
//!
//! Table names are validated `TableName`s and interpolated; every value
//! (destination, barcodes) is a bound parameter.

use super::WarehouseStore;
use crate::models::ContainerRow;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use wrangler_common::db::WAREHOUSE_COLUMNS;
use wrangler_common::{Result, TableName};

/// Barcodes bound per `IN (...)` list, well under SQLite's variable limit
const MARK_CHUNK_SIZE: usize = 500;

/// Warehouse store over a sqlx connection pool
#[derive(Clone)]
pub struct SqlWarehouse {
    pool: SqlitePool,
}

impl SqlWarehouse {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl WarehouseStore for SqlWarehouse {
    async fn fetch_unwrangled(
        &self,
        table: &TableName,
        destination: &str,
    ) -> Result<Vec<ContainerRow>> {
        let rows = sqlx::query_as::<_, ContainerRow>(&format!(
            "SELECT {WAREHOUSE_COLUMNS} FROM {table} \
             WHERE destination = ? AND wrangled IS NULL \
             ORDER BY container_barcode, id"
        ))
        .bind(destination)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(
            table = %table,
            destination,
            rows = rows.len(),
            "Fetched unwrangled rows"
        );

        Ok(rows)
    }

    async fn mark_wrangled(&self, table: &TableName, barcodes: &[String]) -> Result<u64> {
        if barcodes.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut rows_affected = 0;

        for chunk in barcodes.chunks(MARK_CHUNK_SIZE) {
            let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(format!(
                "UPDATE {table} SET wrangled = CURRENT_TIMESTAMP \
                 WHERE wrangled IS NULL AND container_barcode IN ("
            ));
            let mut separated = builder.separated(", ");
            for barcode in chunk {
                separated.push_bind(barcode);
            }
            separated.push_unseparated(")");

            rows_affected += builder.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;

        tracing::debug!(
            table = %table,
            containers = barcodes.len(),
            rows = rows_affected,
            "Marked containers wrangled"
        );

        Ok(rows_affected)
    }

    async fn fetch_container(&self, table: &TableName, barcode: &str) -> Result<Vec<ContainerRow>> {
        let rows = sqlx::query_as::<_, ContainerRow>(&format!(
            "SELECT {WAREHOUSE_COLUMNS} FROM {table} WHERE container_barcode = ? ORDER BY id"
        ))
        .bind(barcode)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
