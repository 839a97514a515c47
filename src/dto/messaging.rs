//! Messaging and message drafting responses.

use serde::Serialize;
use serde_json::Value;

use crate::services::messaging::SmsSent;

#[derive(Debug, Serialize)]
pub struct GeneratedMessage {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsSentResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: Value,
    pub formatted_number: String,
}

impl From<SmsSent> for SmsSentResponse {
    fn from(sent: SmsSent) -> Self {
        Self {
            success: true,
            message: "SMS sent successfully",
            data: sent.data,
            formatted_number: sent.formatted_number,
        }
    }
}
