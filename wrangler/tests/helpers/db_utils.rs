//! Database Test Utilities
//!
//! Temporary SQLite warehouse with the extraction table, plus row builders

use anyhow::Result;
use labware_wrangler::db::SqlWarehouse;
use sqlx::SqlitePool;
use tempfile::TempDir;
use wrangler_common::TableName;

pub const TEST_TABLE: &str = "cgap_heron";
pub const TEST_DESTINATION: &str = "CGAP";

/// Row to insert into the warehouse table
#[derive(Debug, Clone)]
pub struct SeedRow {
    pub container_barcode: String,
    pub destination: String,
    pub study: String,
    pub supplier_sample_id: String,
    pub well_coordinate: Option<String>,
    pub tube_barcode: Option<String>,
    pub tube_position: Option<String>,
}

/// Temporary warehouse - TempDir must be kept alive for duration of test
pub struct TestWarehouse {
    pub temp_dir: TempDir,
    pub pool: SqlitePool,
    pub table: TableName,
}

impl TestWarehouse {
    pub fn store(&self) -> SqlWarehouse {
        SqlWarehouse::new(self.pool.clone())
    }
}

/// Create temporary warehouse database with the extraction table
pub async fn create_test_warehouse() -> Result<TestWarehouse> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test_warehouse.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let pool = wrangler_common::db::init_warehouse_pool(&db_url).await?;
    let table = TableName::parse(TEST_TABLE)?;
    wrangler_common::db::create_warehouse_table(&pool, &table).await?;

    Ok(TestWarehouse {
        temp_dir,
        pool,
        table,
    })
}

/// Wells A01, B01, ... for a plate
pub fn plate_rows(barcode: &str, study: &str, wells: usize) -> Vec<SeedRow> {
    (0..wells)
        .map(|i| SeedRow {
            container_barcode: barcode.to_string(),
            destination: TEST_DESTINATION.to_string(),
            study: study.to_string(),
            supplier_sample_id: format!("{}-S{}", barcode, i + 1),
            well_coordinate: Some(format!("{}01", (b'A' + i as u8) as char)),
            tube_barcode: None,
            tube_position: None,
        })
        .collect()
}

/// Tubes in A1, B1, ... for a tube rack
pub fn tube_rack_rows(barcode: &str, study: &str, tubes: usize) -> Vec<SeedRow> {
    (0..tubes)
        .map(|i| SeedRow {
            container_barcode: barcode.to_string(),
            destination: TEST_DESTINATION.to_string(),
            study: study.to_string(),
            supplier_sample_id: format!("{}-S{}", barcode, i + 1),
            well_coordinate: None,
            tube_barcode: Some(format!("{}-T{}", barcode, i + 1)),
            tube_position: Some(format!("{}1", (b'A' + i as u8) as char)),
        })
        .collect()
}

/// Insert rows into the warehouse table
pub async fn seed_rows(warehouse: &TestWarehouse, rows: &[SeedRow]) -> Result<()> {
    for row in rows {
        sqlx::query(&format!(
            "INSERT INTO {} (container_barcode, destination, study, supplier_sample_id, \
             well_coordinate, tube_barcode, tube_position) VALUES (?, ?, ?, ?, ?, ?, ?)",
            warehouse.table
        ))
        .bind(&row.container_barcode)
        .bind(&row.destination)
        .bind(&row.study)
        .bind(&row.supplier_sample_id)
        .bind(&row.well_coordinate)
        .bind(&row.tube_barcode)
        .bind(&row.tube_position)
        .execute(&warehouse.pool)
        .await?;
    }
    Ok(())
}

/// Distinct barcodes with an unset marker, sorted
pub async fn unwrangled_barcodes(warehouse: &TestWarehouse) -> Result<Vec<String>> {
    let barcodes = sqlx::query_scalar::<_, String>(&format!(
        "SELECT DISTINCT container_barcode FROM {} \
         WHERE wrangled IS NULL ORDER BY container_barcode",
        warehouse.table
    ))
    .fetch_all(&warehouse.pool)
    .await?;
    Ok(barcodes)
}
