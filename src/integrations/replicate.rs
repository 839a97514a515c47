//! Replicate prediction client.
//!
//! A prediction is created with `POST {base}/predictions` and then polled at
//! `GET {base}/predictions/{id}` until it reaches a terminal status or the
//! attempt budget runs out.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::integrations::{AiModel, IntegrationError, PredictionClient, read_body};
use crate::models::config::ReplicateConfig;

const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Prediction {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl Prediction {
    /// Output for a succeeded prediction, error for a failed or canceled one,
    /// `None` while it is still running.
    fn settle(self) -> Option<Result<Value, IntegrationError>> {
        match self.status.as_str() {
            "succeeded" => Some(Ok(self.output.unwrap_or(Value::Null))),
            "failed" | "canceled" => {
                let message = match self.error {
                    Some(Value::String(msg)) if !msg.is_empty() => msg,
                    Some(Value::Null) | None => "Prediction failed".to_string(),
                    Some(other) => other.to_string(),
                };
                Some(Err(IntegrationError::PredictionFailed(message)))
            }
            _ => None,
        }
    }
}

/// Calls `fetch` up to `max_attempts` times, sleeping `interval` between
/// calls, until the prediction settles.
pub async fn poll_until_done<F, Fut>(
    mut fetch: F,
    interval: Duration,
    max_attempts: u32,
) -> Result<Value, IntegrationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Prediction, IntegrationError>>,
{
    for attempt in 1..=max_attempts {
        let prediction = fetch().await?;
        let id = prediction.id.clone();
        if let Some(result) = prediction.settle() {
            return result;
        }
        log::debug!("Prediction {id} still running after attempt {attempt}");
        if attempt < max_attempts {
            tokio::time::sleep(interval).await;
        }
    }
    Err(IntegrationError::TimedOut)
}

/// Flattens prediction output into plain text.
///
/// Strings pass through, arrays of tokens are concatenated and objects carrying
/// a `transcription` field yield that field. Empty output yields `None`.
pub fn output_text(output: &Value) -> Option<String> {
    let text = match output {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Value::Object(map) => match map.get("transcription") {
            Some(Value::String(s)) => s.clone(),
            _ => output.to_string(),
        },
        other => other.to_string(),
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

pub struct ReplicateClient {
    http: reqwest::Client,
    api_token: String,
    base_url: String,
    poll_interval: Duration,
    max_poll_attempts: u32,
    vision_model: String,
    text_model: String,
    transcription_model: String,
}

impl ReplicateClient {
    /// Builds a client when an API token is configured.
    pub fn from_config(config: &ReplicateConfig) -> Result<Option<Self>, IntegrationError> {
        let Some(api_token) = config
            .api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        else {
            return Ok(None);
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Some(Self {
            http,
            api_token: api_token.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_poll_attempts: config.max_poll_attempts.max(1),
            vision_model: config.vision_model.clone(),
            text_model: config.text_model.clone(),
            transcription_model: config.transcription_model.clone(),
        }))
    }

    fn version(&self, model: AiModel) -> &str {
        match model {
            AiModel::Vision => &self.vision_model,
            AiModel::Text => &self.text_model,
            AiModel::Transcription => &self.transcription_model,
        }
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.api_token)
    }

    async fn parse_prediction(response: reqwest::Response) -> Result<Prediction, IntegrationError> {
        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await?;
            return Err(IntegrationError::Api(status.as_u16(), body.to_string()));
        }
        Ok(response.json::<Prediction>().await?)
    }

    async fn create(&self, model: AiModel, input: Value) -> Result<Prediction, IntegrationError> {
        let response = self
            .http
            .post(format!("{}/predictions", self.base_url))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(&json!({ "version": self.version(model), "input": input }))
            .send()
            .await?;
        Self::parse_prediction(response).await
    }

    async fn fetch(&self, id: &str) -> Result<Prediction, IntegrationError> {
        let response = self
            .http
            .get(format!("{}/predictions/{id}", self.base_url))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;
        Self::parse_prediction(response).await
    }
}

#[async_trait]
impl PredictionClient for ReplicateClient {
    async fn run(&self, model: AiModel, input: Value) -> Result<Value, IntegrationError> {
        let created = self.create(model, input).await?;
        log::info!("Created prediction {} on {model:?} model", created.id);

        let id = created.id.clone();
        if let Some(result) = created.settle() {
            return result;
        }

        let id = id.as_str();
        poll_until_done(
            move || self.fetch(id),
            self.poll_interval,
            self.max_poll_attempts,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn prediction(status: &str) -> Prediction {
        Prediction {
            id: "p1".to_string(),
            status: status.to_string(),
            output: None,
            error: None,
        }
    }

    #[actix_web::test]
    async fn polling_returns_output_on_success() {
        let calls = RefCell::new(0);
        let result = poll_until_done(
            || {
                *calls.borrow_mut() += 1;
                let n = *calls.borrow();
                async move {
                    if n < 3 {
                        Ok(prediction("processing"))
                    } else {
                        Ok(Prediction {
                            output: Some(json!("done")),
                            ..prediction("succeeded")
                        })
                    }
                }
            },
            Duration::ZERO,
            10,
        )
        .await;
        assert_eq!(result.unwrap(), json!("done"));
        assert_eq!(*calls.borrow(), 3);
    }

    #[actix_web::test]
    async fn polling_surfaces_provider_error() {
        let result = poll_until_done(
            || async {
                Ok(Prediction {
                    error: Some(json!("out of credit")),
                    ..prediction("failed")
                })
            },
            Duration::ZERO,
            5,
        )
        .await;
        assert!(matches!(result, Err(IntegrationError::PredictionFailed(msg)) if msg == "out of credit"));
    }

    #[actix_web::test]
    async fn canceled_without_error_reads_prediction_failed() {
        let result = poll_until_done(
            || async { Ok(prediction("canceled")) },
            Duration::ZERO,
            5,
        )
        .await;
        assert!(
            matches!(result, Err(IntegrationError::PredictionFailed(msg)) if msg == "Prediction failed")
        );
    }

    #[actix_web::test]
    async fn polling_stops_after_attempt_budget() {
        let calls = RefCell::new(0u32);
        let result = poll_until_done(
            || {
                *calls.borrow_mut() += 1;
                async { Ok(prediction("starting")) }
            },
            Duration::ZERO,
            4,
        )
        .await;
        assert!(matches!(result, Err(IntegrationError::TimedOut)));
        assert_eq!(*calls.borrow(), 4);
    }

    #[actix_web::test]
    async fn fetch_errors_abort_polling() {
        let result = poll_until_done(
            || async { Err(IntegrationError::Network("reset".into())) },
            Duration::ZERO,
            4,
        )
        .await;
        assert!(matches!(result, Err(IntegrationError::Network(_))));
    }

    #[test]
    fn output_text_normalises_shapes() {
        assert_eq!(output_text(&json!("hi")), Some("hi".to_string()));
        assert_eq!(
            output_text(&json!(["Hel", "lo", " there"])),
            Some("Hello there".to_string())
        );
        assert_eq!(
            output_text(&json!({"transcription": "karibu", "segments": []})),
            Some("karibu".to_string())
        );
        assert_eq!(output_text(&json!(null)), None);
        assert_eq!(output_text(&json!("  ")), None);
    }

    #[test]
    fn client_requires_token() {
        let config = ReplicateConfig {
            api_token: Some("  ".into()),
            base_url: "http://localhost".into(),
            poll_interval_ms: 10,
            max_poll_attempts: 3,
            vision_model: "v".into(),
            text_model: "t".into(),
            transcription_model: "w".into(),
        };
        assert!(ReplicateClient::from_config(&config).unwrap().is_none());

        let config = ReplicateConfig {
            api_token: Some("r8_token".into()),
            ..config
        };
        let client = ReplicateClient::from_config(&config).unwrap().unwrap();
        assert_eq!(client.version(AiModel::Transcription), "w");
        assert_eq!(client.auth_header(), "Token r8_token");
    }
}
