//! Data model for a wrangling pass
//!
//! Everything here is ephemeral: built from warehouse rows at the start of a
//! run and dropped when the run ends.

pub mod container;
pub mod labware;
pub mod outcome;

pub use container::{group_by_container, Container, ContainerRow};
pub use labware::{EntityKind, LabwareType};
pub use outcome::{FailedContainer, RunReport, SubmissionOutcome};
