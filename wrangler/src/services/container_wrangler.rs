//! Single-container lookup and wrangle
//!
//! Backs the per-barcode HTTP endpoints. Shares the classifier, resolver,
//! builder and client with the batch orchestrator but runs outside it: it
//! resolves only what one container needs and reports failures as errors.

use crate::db::WarehouseStore;
use crate::error::{WranglerError, WranglerResult};
use crate::models::{ContainerRow, LabwareType};
use crate::services::entity_resolver::EntityResolver;
use crate::services::labware_classifier::classify;
use crate::services::registration_client::{RegistrationClient, RegistrationResponse};
use crate::services::request_builder::build_request;
use serde::Serialize;
use std::sync::Arc;
use wrangler_common::TableName;

/// Warehouse view of one container
#[derive(Debug, Clone, Serialize)]
pub struct ContainerLookup {
    pub barcode: String,
    /// `None` when the rows match no known shape
    pub labware_type: Option<LabwareType>,
    pub wrangled: bool,
    pub rows: Vec<ContainerRow>,
}

/// Per-barcode operations
#[derive(Clone)]
pub struct ContainerWrangler {
    store: Arc<dyn WarehouseStore>,
    resolver: EntityResolver,
    client: Arc<dyn RegistrationClient>,
    table: TableName,
}

impl ContainerWrangler {
    pub fn new(
        store: Arc<dyn WarehouseStore>,
        resolver: EntityResolver,
        client: Arc<dyn RegistrationClient>,
        table: TableName,
    ) -> Self {
        Self {
            store,
            resolver,
            client,
            table,
        }
    }

    /// Rows and classification for a barcode, whatever its marker state
    pub async fn lookup(&self, barcode: &str) -> WranglerResult<ContainerLookup> {
        let rows = self.store.fetch_container(&self.table, barcode).await?;
        if rows.is_empty() {
            return Err(WranglerError::NotFound(format!("No labware with barcode {}", barcode)));
        }

        Ok(ContainerLookup {
            barcode: barcode.to_string(),
            labware_type: classify(barcode, &rows).ok(),
            wrangled: rows.iter().all(|row| row.wrangled.is_some()),
            rows,
        })
    }

    /// Register one unwrangled container and mark it on success
    pub async fn wrangle(&self, barcode: &str) -> WranglerResult<RegistrationResponse> {
        let rows: Vec<ContainerRow> = self
            .store
            .fetch_container(&self.table, barcode)
            .await?
            .into_iter()
            .filter(|row| row.wrangled.is_none())
            .collect();

        let Some(first) = rows.first() else {
            return Err(WranglerError::NotFound(format!(
                "No unwrangled labware with barcode {}",
                barcode
            )));
        };

        let labware_type = classify(barcode, &rows)?;
        let study_uuid = self.resolver.resolve_study_uuid(&first.study).await?;
        let purpose_uuid = self.resolver.resolve_purpose_uuid(labware_type).await?;
        let payload = build_request(labware_type, barcode, &rows, study_uuid, purpose_uuid);

        let response = self
            .client
            .submit(labware_type, &payload)
            .await
            .map_err(|e| WranglerError::SubmissionFailed {
                barcode: barcode.to_string(),
                status: None,
                body: e.to_string(),
            })?;

        if !response.is_created() {
            tracing::error!(
                barcode,
                status = response.status,
                "Labware failed to be created: {}",
                response.body
            );
            return Err(WranglerError::SubmissionFailed {
                barcode: barcode.to_string(),
                status: Some(response.status),
                body: response.body,
            });
        }

        self.store
            .mark_wrangled(&self.table, &[barcode.to_string()])
            .await?;
        tracing::info!(barcode, labware_type = %labware_type, "Labware created");

        Ok(response)
    }
}
