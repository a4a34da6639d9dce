//! Labware registration client
//!
//! Posts creation payloads to the registration service. A submission is a
//! success only when the service answers `201 Created`; any other status is
//! handed back with its body so the orchestrator can report it.

use crate::models::LabwareType;
use crate::utils::retry_with_backoff;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use wrangler_common::config::RegistrationConfig;

/// Header carrying the service API key
pub const CLIENT_ID_HEADER: &str = "X-Sequencescape-Client-Id";

const USER_AGENT: &str = concat!("labware-wrangler/", env!("CARGO_PKG_VERSION"));

/// Transport-level submission errors (no HTTP status received)
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Connection never established; the request was not sent
    #[error("Connection error: {0}")]
    Connect(String),

    /// Failed after the request may have reached the service
    #[error("Network error: {0}")]
    Network(String),

    #[error("Client setup error: {0}")]
    Setup(String),
}

/// Status and raw body returned by the registration service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationResponse {
    pub status: u16,
    pub body: String,
}

impl RegistrationResponse {
    /// Success means `201 Created`, nothing else
    pub fn is_created(&self) -> bool {
        self.status == StatusCode::CREATED.as_u16()
    }
}

/// Submits labware creation payloads
#[async_trait]
pub trait RegistrationClient: Send + Sync {
    async fn submit(
        &self,
        labware_type: LabwareType,
        payload: &Value,
    ) -> Result<RegistrationResponse, SubmissionError>;
}

/// Shared reqwest client construction for the service's APIs
pub fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, SubmissionError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| SubmissionError::Setup(e.to_string()))
}

/// HTTP registration client
pub struct HttpRegistrationClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    max_attempts: u32,
}

impl HttpRegistrationClient {
    pub fn new(config: &RegistrationConfig) -> Result<Self, SubmissionError> {
        Ok(Self {
            http_client: build_http_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            max_attempts: config.max_attempts,
        })
    }

    fn endpoint(&self, labware_type: LabwareType) -> String {
        let collection = match labware_type {
            LabwareType::Plate => "plates",
            LabwareType::TubeRack => "tube_racks",
        };
        format!("{}/api/v2/heron/{}", self.base_url, collection)
    }

    async fn post_once(
        &self,
        url: &str,
        payload: &Value,
    ) -> Result<RegistrationResponse, SubmissionError> {
        let response = self
            .http_client
            .post(url)
            .header(CLIENT_ID_HEADER, &self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    SubmissionError::Connect(e.to_string())
                } else {
                    SubmissionError::Network(e.to_string())
                }
            })?;

        // Once a status exists the service has acted on the request
        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(status, "Failed to read registration response body: {}", e);
                format!("Failed to read response body: {}", e)
            }
        };

        Ok(RegistrationResponse { status, body })
    }
}

/// Retry unsent requests and server-side failures
///
/// A request that may have reached the service without an answer is not
/// repeated: creation is not idempotent.
fn is_retryable(result: &Result<RegistrationResponse, SubmissionError>) -> bool {
    match result {
        Ok(response) => response.status >= 500,
        Err(SubmissionError::Connect(_)) => true,
        Err(SubmissionError::Network(_) | SubmissionError::Setup(_)) => false,
    }
}

#[async_trait]
impl RegistrationClient for HttpRegistrationClient {
    async fn submit(
        &self,
        labware_type: LabwareType,
        payload: &Value,
    ) -> Result<RegistrationResponse, SubmissionError> {
        let url = self.endpoint(labware_type);
        tracing::debug!(labware_type = %labware_type, url = %url, "Submitting labware");

        retry_with_backoff(
            "labware submission",
            self.max_attempts,
            is_retryable,
            || self.post_once(&url, payload),
        )
        .await
    }
}
