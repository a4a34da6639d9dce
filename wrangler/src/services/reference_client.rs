//! Reference data API client
//!
//! Looks up study and purpose uuids by name:
//! `GET {base_url}/api/v2/{collection}?filter[name]={name}` and takes
//! `data[0].attributes.uuid` from the JSON:API response.

use crate::error::{WranglerError, WranglerResult};
use crate::models::EntityKind;
use crate::services::entity_resolver::ReferenceBackend;
use crate::services::registration_client::{build_http_client, CLIENT_ID_HEADER};
use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;
use wrangler_common::config::RegistrationConfig;

/// JSON:API collection response
#[derive(Debug, Deserialize)]
struct ReferenceResponse {
    data: Vec<ReferenceRecord>,
}

#[derive(Debug, Deserialize)]
struct ReferenceRecord {
    attributes: ReferenceAttributes,
}

#[derive(Debug, Deserialize)]
struct ReferenceAttributes {
    uuid: String,
}

/// Reference backend talking to the registration service's read API
pub struct HttpReferenceClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpReferenceClient {
    pub fn new(config: &RegistrationConfig) -> WranglerResult<Self> {
        Ok(Self {
            http_client: build_http_client(config.timeout_secs)
                .map_err(|e| WranglerError::ReferenceLookup(e.to_string()))?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl ReferenceBackend for HttpReferenceClient {
    async fn lookup_uuid(&self, kind: EntityKind, name: &str) -> WranglerResult<Uuid> {
        let url = format!("{}/api/v2/{}", self.base_url, kind.collection());

        tracing::debug!(kind = %kind, name, url = %url, "Looking up reference uuid");

        let response = self
            .http_client
            .get(&url)
            .header(CLIENT_ID_HEADER, &self.api_key)
            .query(&[("filter[name]", name)])
            .send()
            .await
            .map_err(|e| WranglerError::ReferenceLookup(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(WranglerError::ReferenceLookup(format!(
                "{} lookup for '{}' returned {}: {}",
                kind, name, status, error_text
            )));
        }

        let parsed: ReferenceResponse = response
            .json()
            .await
            .map_err(|e| WranglerError::ReferenceLookup(e.to_string()))?;

        let record = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| WranglerError::UnresolvedReference {
                kind,
                name: name.to_string(),
            })?;

        Uuid::parse_str(&record.attributes.uuid).map_err(|e| {
            WranglerError::ReferenceLookup(format!(
                "{} '{}' has malformed uuid '{}': {}",
                kind, name, record.attributes.uuid, e
            ))
        })
    }
}
