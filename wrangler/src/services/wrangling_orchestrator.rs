//! Batch wrangling orchestrator
//!
//! One call to [`WranglingOrchestrator::run`] is one scheduled pass:
//!
//! 1. Fetch unwrangled rows for the destination, ordered by barcode
//! 2. Stop if there are none (no lookups, no submissions)
//! 3. Resolve every distinct study once, and both purposes once
//! 4. Group rows by barcode; classify, build and submit each container in order
//! 5. Split outcomes into succeeded / failed
//! 6. Mark all succeeded containers in one warehouse write; log the failures
//!
//! Submission failures stay inside the run. Store and resolver errors abort
//! it, as does unrecognized labware unless the policy says `report`.

use crate::db::WarehouseStore;
use crate::error::WranglerResult;
use crate::models::{group_by_container, Container, RunReport, SubmissionOutcome};
use crate::services::entity_resolver::{study_uuid_for, EntityResolver, PurposeUuids};
use crate::services::labware_classifier::classify;
use crate::services::registration_client::RegistrationClient;
use crate::services::request_builder::build_request;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;
use wrangler_common::{TableName, UnrecognizedLabwarePolicy};

/// Run-scoped configuration
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub table: TableName,
    pub destination: String,
    pub on_unrecognized_labware: UnrecognizedLabwarePolicy,
}

/// Drives one wrangling pass over the warehouse
pub struct WranglingOrchestrator {
    store: Arc<dyn WarehouseStore>,
    resolver: EntityResolver,
    client: Arc<dyn RegistrationClient>,
    settings: RunSettings,
}

impl WranglingOrchestrator {
    /// Create new orchestrator
    ///
    /// # Arguments
    /// * `store` - Warehouse handle, owns its connection pool
    /// * `resolver` - Study/purpose uuid resolver
    /// * `client` - Registration service client
    /// * `settings` - Table, destination and unrecognized-labware policy
    pub fn new(
        store: Arc<dyn WarehouseStore>,
        resolver: EntityResolver,
        client: Arc<dyn RegistrationClient>,
        settings: RunSettings,
    ) -> Self {
        Self {
            store,
            resolver,
            client,
            settings,
        }
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Execute one complete wrangling pass
    pub async fn run(&self) -> WranglerResult<RunReport> {
        let start_time = Instant::now();
        let table = &self.settings.table;

        tracing::info!(
            table = %table,
            destination = %self.settings.destination,
            "Starting wrangling run"
        );

        let rows = self
            .store
            .fetch_unwrangled(table, &self.settings.destination)
            .await?;

        if rows.is_empty() {
            tracing::info!("No unwrangled labware found");
            return Ok(RunReport::default());
        }

        // Lookups happen once per run, ahead of any submission
        let study_uuids = self
            .resolver
            .resolve_study_uuids(rows.iter().map(|row| row.study.as_str()))
            .await?;
        let purpose_uuids = self.resolver.resolve_purpose_uuids().await?;

        let containers = group_by_container(rows);
        tracing::info!(containers = containers.len(), "Submitting labware");

        let mut outcomes = Vec::with_capacity(containers.len());
        for container in &containers {
            let outcome = self
                .submit_container(container, &study_uuids, &purpose_uuids)
                .await?;
            outcomes.push(outcome);
        }

        let report = RunReport::partition(outcomes);

        if !report.succeeded.is_empty() {
            self.store.mark_wrangled(table, &report.succeeded).await?;
            tracing::info!(
                count = report.succeeded.len(),
                "The following labware were successfully created: {}",
                report.succeeded.join(",")
            );
        }

        for failed in &report.failed {
            tracing::error!(
                barcode = %failed.barcode,
                "Labware failed to be created: {}",
                failed.response_body
            );
        }

        tracing::info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Wrangling run completed"
        );

        Ok(report)
    }

    /// Classify, build and submit one container
    async fn submit_container(
        &self,
        container: &Container,
        study_uuids: &HashMap<String, Uuid>,
        purpose_uuids: &PurposeUuids,
    ) -> WranglerResult<SubmissionOutcome> {
        let barcode = container.barcode.as_str();

        let labware_type = match classify(barcode, &container.rows) {
            Ok(labware_type) => labware_type,
            Err(err) => match self.settings.on_unrecognized_labware {
                UnrecognizedLabwarePolicy::Abort => {
                    tracing::error!(barcode, "Unrecognized labware, aborting run");
                    return Err(err);
                }
                UnrecognizedLabwarePolicy::Report => {
                    tracing::warn!(barcode, "Unrecognized labware, skipping container");
                    return Ok(SubmissionOutcome::failure(barcode, err.to_string()));
                }
            },
        };

        let study_uuid = study_uuid_for(study_uuids, container.study())?;
        let purpose_uuid = purpose_uuids.for_type(labware_type);
        let payload = build_request(
            labware_type,
            barcode,
            &container.rows,
            study_uuid,
            purpose_uuid,
        );

        tracing::debug!(
            barcode,
            labware_type = %labware_type,
            rows = container.rows.len(),
            "Submitting container"
        );

        let outcome = match self.client.submit(labware_type, &payload).await {
            Ok(response) if response.is_created() => {
                SubmissionOutcome::success(barcode, response.body)
            }
            Ok(response) => {
                tracing::debug!(barcode, status = response.status, "Submission not created");
                SubmissionOutcome::failure(barcode, response.body)
            }
            Err(err) => SubmissionOutcome::failure(barcode, err.to_string()),
        };

        Ok(outcome)
    }
}
