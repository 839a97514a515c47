//! WhatsApp Cloud API text messages.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::domain::profile::WhatsAppCredentials;
use crate::integrations::{GatewayResponse, IntegrationError, WhatsAppGateway, read_body};
use crate::models::config::WhatsAppConfig;

pub struct WhatsAppClient {
    http: reqwest::Client,
    base_url: String,
}

fn text_message(to: &str, body: &str) -> Value {
    json!({
        "messaging_product": "whatsapp",
        "to": to,
        "type": "text",
        "text": { "body": body },
    })
}

impl WhatsAppClient {
    pub fn new(config: &WhatsAppConfig) -> Result<Self, IntegrationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn messages_url(&self, phone_id: &str) -> String {
        format!("{}/{phone_id}/messages", self.base_url)
    }
}

#[async_trait]
impl WhatsAppGateway for WhatsAppClient {
    async fn send_text(
        &self,
        credentials: &WhatsAppCredentials,
        to: &str,
        body: &str,
    ) -> Result<GatewayResponse, IntegrationError> {
        let response = self
            .http
            .post(self.messages_url(&credentials.phone_id))
            .bearer_auth(&credentials.token)
            .json(&text_message(to, body))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = read_body(response).await?;
        if status >= 400 {
            log::warn!("WhatsApp API answered {status}: {body}");
        }

        Ok(GatewayResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_messages_url_for_phone_id() {
        let client = WhatsAppClient::new(&WhatsAppConfig {
            base_url: "https://graph.facebook.com/v17.0/".into(),
        })
        .unwrap();
        assert_eq!(
            client.messages_url("1234"),
            "https://graph.facebook.com/v17.0/1234/messages"
        );
    }

    #[test]
    fn text_message_shape() {
        let message = text_message("255700000001", "Asante");
        assert_eq!(message["type"], "text");
        assert_eq!(message["text"]["body"], "Asante");
        assert_eq!(message["messaging_product"], "whatsapp");
    }
}
