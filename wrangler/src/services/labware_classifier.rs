//! Plate / tube rack classification from row shapes

use crate::error::{WranglerError, WranglerResult};
use crate::models::{ContainerRow, LabwareType};

fn has_value(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn is_well(row: &ContainerRow) -> bool {
    has_value(&row.well_coordinate) && !has_value(&row.tube_barcode)
}

fn is_tube(row: &ContainerRow) -> bool {
    has_value(&row.tube_barcode)
        && has_value(&row.tube_position)
        && !has_value(&row.well_coordinate)
}

/// Decide the labware type of a container
///
/// Every row must have the same shape: wells (coordinate, no tube barcode)
/// make a plate, tubes (barcode and rack position, no well coordinate) make
/// a tube rack. Anything else, including an empty container, is
/// `UnrecognizedLabware`.
pub fn classify(barcode: &str, rows: &[ContainerRow]) -> WranglerResult<LabwareType> {
    let unrecognized = || WranglerError::UnrecognizedLabware {
        barcode: barcode.to_string(),
    };

    if rows.is_empty() {
        return Err(unrecognized());
    }

    if rows.iter().all(is_well) {
        Ok(LabwareType::Plate)
    } else if rows.iter().all(is_tube) {
        Ok(LabwareType::TubeRack)
    } else {
        Err(unrecognized())
    }
}
