//! Labware and reference entity kinds

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of a container as understood by the registration service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabwareType {
    Plate,
    TubeRack,
}

impl fmt::Display for LabwareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabwareType::Plate => f.write_str("plate"),
            LabwareType::TubeRack => f.write_str("tube rack"),
        }
    }
}

/// Reference data collections the resolver can look names up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Study,
    Purpose,
}

impl EntityKind {
    /// Collection name in the reference API path
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Study => "studies",
            EntityKind::Purpose => "purposes",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Study => f.write_str("study"),
            EntityKind::Purpose => f.write_str("purpose"),
        }
    }
}
