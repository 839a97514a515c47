//! NextSMS single-message gateway.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::profile::SmsCredentials;
use crate::integrations::{GatewayResponse, IntegrationError, SmsGateway, read_body};
use crate::models::config::NextSmsConfig;

#[derive(Debug, Serialize)]
struct OutgoingSms<'a> {
    from: &'a str,
    to: &'a str,
    text: &'a str,
}

pub struct NextSmsClient {
    http: reqwest::Client,
    url: String,
    default_sender_id: String,
}

impl NextSmsClient {
    pub fn new(config: &NextSmsConfig) -> Result<Self, IntegrationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            url: config.url.clone(),
            default_sender_id: config.default_sender_id.clone(),
        })
    }

    fn sender<'a>(&'a self, credentials: &'a SmsCredentials) -> &'a str {
        credentials
            .sender_id
            .as_deref()
            .unwrap_or(&self.default_sender_id)
    }
}

#[async_trait]
impl SmsGateway for NextSmsClient {
    async fn send_sms(
        &self,
        credentials: &SmsCredentials,
        to: &str,
        text: &str,
    ) -> Result<GatewayResponse, IntegrationError> {
        let payload = OutgoingSms {
            from: self.sender(credentials),
            to,
            text,
        };

        let response = self
            .http
            .post(&self.url)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .json(&payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = read_body(response).await?;
        log::info!("NextSMS answered {status} for message to {to}");

        Ok(GatewayResponse { status, body })
    }
}
