//! Labware creation payloads
//!
//! Pure transformations from warehouse rows to the JSON:API documents the
//! registration service accepts. The classifier has already checked the
//! row shapes, so missing fields here only happen for hand-built input and
//! are skipped rather than failing the container.

use crate::models::{ContainerRow, LabwareType};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Number of slots in a tube rack
pub const TUBE_RACK_SIZE: u32 = 96;

fn sample_content(row: &ContainerRow) -> Value {
    json!({
        "supplier_name": row.supplier_sample_id.clone().unwrap_or_default(),
    })
}

/// Plate document keyed by well coordinate
pub fn build_plate_request(
    barcode: &str,
    rows: &[ContainerRow],
    study_uuid: Uuid,
    purpose_uuid: Uuid,
) -> Value {
    let wells: Map<String, Value> = rows
        .iter()
        .filter_map(|row| {
            let coordinate = row.well_coordinate.as_deref()?;
            Some((
                coordinate.to_string(),
                json!({ "content": sample_content(row) }),
            ))
        })
        .collect();

    json!({
        "data": {
            "type": "plates",
            "attributes": {
                "barcode": barcode,
                "purpose_uuid": purpose_uuid,
                "study_uuid": study_uuid,
                "wells": wells,
            }
        }
    })
}

/// Tube rack document keyed by rack position
pub fn build_tube_rack_request(
    barcode: &str,
    rows: &[ContainerRow],
    study_uuid: Uuid,
    purpose_uuid: Uuid,
) -> Value {
    let tubes: Map<String, Value> = rows
        .iter()
        .filter_map(|row| {
            let position = row.tube_position.as_deref()?;
            let tube_barcode = row.tube_barcode.as_deref()?;
            Some((
                position.to_string(),
                json!({
                    "barcode": tube_barcode,
                    "content": sample_content(row),
                }),
            ))
        })
        .collect();

    json!({
        "data": {
            "type": "tube_racks",
            "attributes": {
                "tube_rack": {
                    "barcode": barcode,
                    "size": TUBE_RACK_SIZE,
                    "purpose_uuid": purpose_uuid,
                    "study_uuid": study_uuid,
                    "tubes": tubes,
                }
            }
        }
    })
}

/// Dispatch on labware type
pub fn build_request(
    labware_type: LabwareType,
    barcode: &str,
    rows: &[ContainerRow],
    study_uuid: Uuid,
    purpose_uuid: Uuid,
) -> Value {
    match labware_type {
        LabwareType::Plate => build_plate_request(barcode, rows, study_uuid, purpose_uuid),
        LabwareType::TubeRack => build_tube_rack_request(barcode, rows, study_uuid, purpose_uuid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(well: Option<&str>, tube: Option<(&str, &str)>, sample: &str) -> ContainerRow {
        ContainerRow {
            id: 0,
            container_barcode: "C1".to_string(),
            destination: "CGAP".to_string(),
            study: "Heron".to_string(),
            supplier_sample_id: Some(sample.to_string()),
            well_coordinate: well.map(str::to_string),
            tube_barcode: tube.map(|(barcode, _)| barcode.to_string()),
            tube_position: tube.map(|(_, position)| position.to_string()),
            wrangled: None,
        }
    }

    #[test]
    fn test_plate_request_shape() {
        let study = Uuid::new_v4();
        let purpose = Uuid::new_v4();
        let rows = vec![row(Some("A01"), None, "S1"), row(Some("B01"), None, "S2")];

        let body = build_plate_request("DN1", &rows, study, purpose);
        let attributes = &body["data"]["attributes"];

        assert_eq!(body["data"]["type"], "plates");
        assert_eq!(attributes["barcode"], "DN1");
        assert_eq!(attributes["study_uuid"], study.to_string());
        assert_eq!(attributes["purpose_uuid"], purpose.to_string());
        assert_eq!(attributes["wells"]["A01"]["content"]["supplier_name"], "S1");
        assert_eq!(attributes["wells"]["B01"]["content"]["supplier_name"], "S2");
    }

    #[test]
    fn test_tube_rack_request_shape() {
        let study = Uuid::new_v4();
        let purpose = Uuid::new_v4();
        let rows = vec![row(None, Some(("FR1", "A1")), "S1")];

        let body = build_request(LabwareType::TubeRack, "RK1", &rows, study, purpose);
        let rack = &body["data"]["attributes"]["tube_rack"];

        assert_eq!(body["data"]["type"], "tube_racks");
        assert_eq!(rack["barcode"], "RK1");
        assert_eq!(rack["size"], 96);
        assert_eq!(rack["tubes"]["A1"]["barcode"], "FR1");
        assert_eq!(rack["tubes"]["A1"]["content"]["supplier_name"], "S1");
    }

    #[test]
    fn test_rows_missing_fields_are_skipped() {
        let rows = vec![row(None, None, "S1")];
        let body = build_plate_request("DN1", &rows, Uuid::nil(), Uuid::nil());
        assert!(body["data"]["attributes"]["wells"].as_object().unwrap().is_empty());
    }
}
