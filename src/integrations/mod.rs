//! Outbound HTTP clients for the AI provider and the messaging gateways.
//!
//! Services only see the traits declared here, so handlers can be exercised
//! against mocks without network access.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::profile::{SmsCredentials, WhatsAppCredentials};
use crate::integrations::nextsms::NextSmsClient;
use crate::integrations::replicate::ReplicateClient;
use crate::integrations::whatsapp::WhatsAppClient;
use crate::models::config::ServerConfig;

#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod nextsms;
pub mod replicate;
pub mod whatsapp;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    PredictionFailed(String),

    #[error("Prediction timed out")]
    TimedOut,
}

impl From<reqwest::Error> for IntegrationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            IntegrationError::Parse(err.to_string())
        } else {
            IntegrationError::Network(err.to_string())
        }
    }
}

/// Which configured model a prediction runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiModel {
    /// Image understanding, used for OCR intake.
    Vision,
    /// Text generation, used for extraction and follow-up messages.
    Text,
    /// Speech to text.
    Transcription,
}

/// Raw gateway reply; non-2xx statuses are not errors at this level.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: Value,
}

impl GatewayResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait PredictionClient: Send + Sync {
    /// Creates a prediction and waits for its output.
    async fn run(&self, model: AiModel, input: Value) -> Result<Value, IntegrationError>;
}

#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send_sms(
        &self,
        credentials: &SmsCredentials,
        to: &str,
        text: &str,
    ) -> Result<GatewayResponse, IntegrationError>;
}

#[async_trait]
pub trait WhatsAppGateway: Send + Sync {
    async fn send_text(
        &self,
        credentials: &WhatsAppCredentials,
        to: &str,
        body: &str,
    ) -> Result<GatewayResponse, IntegrationError>;
}

/// Clients shared by all workers. `predictions` is `None` when no AI token is
/// configured.
#[derive(Clone)]
pub struct Integrations {
    pub predictions: Option<Arc<dyn PredictionClient>>,
    pub sms: Arc<dyn SmsGateway>,
    pub whatsapp: Arc<dyn WhatsAppGateway>,
}

impl Integrations {
    /// Builds the production clients from configuration.
    pub fn from_config(config: &ServerConfig) -> Result<Self, IntegrationError> {
        let predictions = ReplicateClient::from_config(&config.replicate)?
            .map(|client| Arc::new(client) as Arc<dyn PredictionClient>);
        if predictions.is_none() {
            log::warn!("Replicate API token not set; AI intake is disabled");
        }
        Ok(Self {
            predictions,
            sms: Arc::new(NextSmsClient::new(&config.nextsms)?),
            whatsapp: Arc::new(WhatsAppClient::new(&config.whatsapp)?),
        })
    }
}

/// Reads a response body as JSON, falling back to the raw text.
pub(crate) async fn read_body(response: reqwest::Response) -> Result<Value, IntegrationError> {
    let text = response.text().await?;
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}
