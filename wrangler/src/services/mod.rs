//! Service modules for the wrangling pipeline
//!
//! Leaf-first: classifier and request builder are pure; the resolver,
//! reference client and registration client talk to the registration
//! service; the orchestrator and container wrangler tie them together.

pub mod container_wrangler;
pub mod entity_resolver;
pub mod labware_classifier;
pub mod reference_client;
pub mod registration_client;
pub mod request_builder;
pub mod wrangling_orchestrator;

pub use container_wrangler::{ContainerLookup, ContainerWrangler};
pub use entity_resolver::{EntityResolver, PurposeUuids, ReferenceBackend};
pub use labware_classifier::classify;
pub use reference_client::HttpReferenceClient;
pub use registration_client::{
    HttpRegistrationClient, RegistrationClient, RegistrationResponse, SubmissionError,
};
pub use request_builder::{build_plate_request, build_request, build_tube_rack_request};
pub use wrangling_orchestrator::{RunSettings, WranglingOrchestrator};
