//! Warehouse rows and their grouping into containers

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One well or tube as stored in the warehouse extraction table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContainerRow {
    pub id: i64,
    /// Plate or rack barcode; groups rows into one container
    pub container_barcode: String,
    pub destination: String,
    /// Study name, resolved to a uuid before submission
    pub study: String,
    pub supplier_sample_id: Option<String>,
    /// Plate well, e.g. `A01`
    pub well_coordinate: Option<String>,
    pub tube_barcode: Option<String>,
    /// Rack slot, e.g. `A1`
    pub tube_position: Option<String>,
    /// Wrangled marker; `None` means eligible for the next scan
    pub wrangled: Option<NaiveDateTime>,
}

/// Rows sharing one container barcode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub barcode: String,
    pub rows: Vec<ContainerRow>,
}

impl Container {
    /// Study of the container, taken from its first row
    ///
    /// All rows of a container are assumed to carry the same study.
    pub fn study(&self) -> &str {
        self.rows.first().map(|row| row.study.as_str()).unwrap_or_default()
    }
}

/// Split rows into containers by contiguous runs of `container_barcode`
///
/// Input must already be ordered by barcode (the warehouse scan guarantees
/// it); a barcode that reappears after a different one starts a new group.
/// Group order follows input order.
pub fn group_by_container(rows: Vec<ContainerRow>) -> Vec<Container> {
    let mut containers: Vec<Container> = Vec::new();

    for row in rows {
        match containers.last_mut() {
            Some(current) if current.barcode == row.container_barcode => current.rows.push(row),
            _ => containers.push(Container {
                barcode: row.container_barcode.clone(),
                rows: vec![row],
            }),
        }
    }

    containers
}
