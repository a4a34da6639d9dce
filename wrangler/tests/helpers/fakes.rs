//! Recording fakes for the reference backend and registration client

use async_trait::async_trait;
use labware_wrangler::models::{EntityKind, LabwareType};
use labware_wrangler::services::{
    ReferenceBackend, RegistrationClient, RegistrationResponse, SubmissionError,
};
use labware_wrangler::{WranglerError, WranglerResult};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use uuid::Uuid;
use wrangler_common::config::PurposeConfig;

/// Reference backend that knows a fixed set of names and records lookups
pub struct RecordingReferenceBackend {
    known: HashMap<(EntityKind, String), Uuid>,
    calls: Mutex<Vec<(EntityKind, String)>>,
}

impl RecordingReferenceBackend {
    /// Knows the given studies plus the default purposes
    pub fn with_studies(studies: &[&str]) -> Self {
        let purposes = PurposeConfig::default();
        let mut known = HashMap::new();
        for study in studies {
            known.insert((EntityKind::Study, study.to_string()), Uuid::new_v4());
        }
        known.insert((EntityKind::Purpose, purposes.plate), Uuid::new_v4());
        known.insert((EntityKind::Purpose, purposes.tube_rack), Uuid::new_v4());

        Self {
            known,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn uuid_of(&self, kind: EntityKind, name: &str) -> Uuid {
        self.known[&(kind, name.to_string())]
    }

    pub fn calls(&self) -> Vec<(EntityKind, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, kind: EntityKind) -> usize {
        self.calls().iter().filter(|(k, _)| *k == kind).count()
    }
}

#[async_trait]
impl ReferenceBackend for RecordingReferenceBackend {
    async fn lookup_uuid(&self, kind: EntityKind, name: &str) -> WranglerResult<Uuid> {
        self.calls.lock().unwrap().push((kind, name.to_string()));
        self.known
            .get(&(kind, name.to_string()))
            .copied()
            .ok_or_else(|| WranglerError::UnresolvedReference {
                kind,
                name: name.to_string(),
            })
    }
}

/// One recorded submission
#[derive(Debug, Clone)]
pub struct Submission {
    pub labware_type: LabwareType,
    pub barcode: String,
    pub payload: Value,
}

/// Registration client answering 201 unless a barcode is scripted to fail
#[derive(Default)]
pub struct ScriptedRegistrationClient {
    rejected: HashSet<String>,
    unreachable: HashSet<String>,
    submissions: Mutex<Vec<Submission>>,
}

impl ScriptedRegistrationClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer 422 with an error body for this barcode
    pub fn rejecting(mut self, barcode: &str) -> Self {
        self.rejected.insert(barcode.to_string());
        self
    }

    /// Fail at the transport level for this barcode
    pub fn unreachable_for(mut self, barcode: &str) -> Self {
        self.unreachable.insert(barcode.to_string());
        self
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn submitted_barcodes(&self) -> Vec<String> {
        self.submissions().into_iter().map(|s| s.barcode).collect()
    }
}

fn payload_barcode(labware_type: LabwareType, payload: &Value) -> String {
    let attributes = &payload["data"]["attributes"];
    let barcode = match labware_type {
        LabwareType::Plate => &attributes["barcode"],
        LabwareType::TubeRack => &attributes["tube_rack"]["barcode"],
    };
    barcode.as_str().unwrap_or_default().to_string()
}

#[async_trait]
impl RegistrationClient for ScriptedRegistrationClient {
    async fn submit(
        &self,
        labware_type: LabwareType,
        payload: &Value,
    ) -> Result<RegistrationResponse, SubmissionError> {
        let barcode = payload_barcode(labware_type, payload);
        self.submissions.lock().unwrap().push(Submission {
            labware_type,
            barcode: barcode.clone(),
            payload: payload.clone(),
        });

        if self.unreachable.contains(&barcode) {
            return Err(SubmissionError::Connect("connection refused".to_string()));
        }
        if self.rejected.contains(&barcode) {
            return Ok(RegistrationResponse {
                status: 422,
                body: format!(r#"{{"errors":["{} rejected"]}}"#, barcode),
            });
        }
        Ok(RegistrationResponse {
            status: 201,
            body: format!(r#"{{"data":{{"barcode":"{}"}}}}"#, barcode),
        })
    }
}
