//! Study and purpose identifier resolution
//!
//! Resolution happens once per run and the results are held read-only for
//! that run. Nothing is cached across runs.

use crate::error::{WranglerError, WranglerResult};
use crate::models::{EntityKind, LabwareType};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use uuid::Uuid;
use wrangler_common::config::PurposeConfig;

/// Reference data lookup: `(kind, name) -> uuid`
///
/// Implementations return `UnresolvedReference` when the name is unknown.
#[async_trait]
pub trait ReferenceBackend: Send + Sync {
    async fn lookup_uuid(&self, kind: EntityKind, name: &str) -> WranglerResult<Uuid>;
}

/// Purpose uuids for both labware types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurposeUuids {
    pub plate: Uuid,
    pub tube_rack: Uuid,
}

impl PurposeUuids {
    pub fn for_type(&self, labware_type: LabwareType) -> Uuid {
        match labware_type {
            LabwareType::Plate => self.plate,
            LabwareType::TubeRack => self.tube_rack,
        }
    }
}

/// Resolves names found in warehouse rows to service identifiers
#[derive(Clone)]
pub struct EntityResolver {
    backend: Arc<dyn ReferenceBackend>,
    purposes: PurposeConfig,
}

impl EntityResolver {
    pub fn new(backend: Arc<dyn ReferenceBackend>, purposes: PurposeConfig) -> Self {
        Self { backend, purposes }
    }

    /// Map each distinct study name to its uuid
    ///
    /// Duplicates in `names` are collapsed first, so the backend sees one
    /// lookup per distinct study.
    pub async fn resolve_study_uuids<'a, I>(
        &self,
        names: I,
    ) -> WranglerResult<HashMap<String, Uuid>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = names.into_iter().collect();
        let mut study_uuids = HashMap::with_capacity(distinct.len());

        for name in distinct {
            let uuid = self.backend.lookup_uuid(EntityKind::Study, name).await?;
            study_uuids.insert(name.to_string(), uuid);
        }

        tracing::debug!(studies = study_uuids.len(), "Resolved study uuids");
        Ok(study_uuids)
    }

    pub async fn resolve_study_uuid(&self, name: &str) -> WranglerResult<Uuid> {
        self.backend.lookup_uuid(EntityKind::Study, name).await
    }

    pub async fn resolve_plate_purpose_uuid(&self) -> WranglerResult<Uuid> {
        self.backend
            .lookup_uuid(EntityKind::Purpose, &self.purposes.plate)
            .await
    }

    pub async fn resolve_tube_rack_purpose_uuid(&self) -> WranglerResult<Uuid> {
        self.backend
            .lookup_uuid(EntityKind::Purpose, &self.purposes.tube_rack)
            .await
    }

    /// Resolve the purpose for a single labware type
    pub async fn resolve_purpose_uuid(&self, labware_type: LabwareType) -> WranglerResult<Uuid> {
        match labware_type {
            LabwareType::Plate => self.resolve_plate_purpose_uuid().await,
            LabwareType::TubeRack => self.resolve_tube_rack_purpose_uuid().await,
        }
    }

    /// Both purposes, exactly one lookup each
    pub async fn resolve_purpose_uuids(&self) -> WranglerResult<PurposeUuids> {
        Ok(PurposeUuids {
            plate: self.resolve_plate_purpose_uuid().await?,
            tube_rack: self.resolve_tube_rack_purpose_uuid().await?,
        })
    }
}

/// Look up a study in a run's resolved map
pub fn study_uuid_for(study_uuids: &HashMap<String, Uuid>, study: &str) -> WranglerResult<Uuid> {
    study_uuids
        .get(study)
        .copied()
        .ok_or_else(|| WranglerError::UnresolvedReference {
            kind: EntityKind::Study,
            name: study.to_string(),
        })
}
