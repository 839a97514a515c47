use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{FollowupId, FollowupMethod};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Payload for `POST /api/send-sms`.
pub struct SendSmsForm {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    #[validate(length(max = 1600))]
    pub message: String,
    #[serde(default)]
    pub followup_id: Option<i32>,
}

/// Validated SMS request.
#[derive(Debug, Clone, PartialEq)]
pub struct SmsRequest {
    pub phone_number: String,
    pub message: String,
    pub followup_id: Option<FollowupId>,
}

impl TryFrom<SendSmsForm> for SmsRequest {
    type Error = FormError;

    fn try_from(form: SendSmsForm) -> Result<Self, Self::Error> {
        form.validate()?;
        if form.phone_number.trim().is_empty() || form.message.trim().is_empty() {
            return Err(FormError::Missing("Phone number and message"));
        }
        let followup_id = match form.followup_id {
            Some(id) if id != 0 => Some(
                FollowupId::new(id).map_err(|e| FormError::InvalidValue(e.to_string()))?,
            ),
            _ => None,
        };
        Ok(Self {
            phone_number: form.phone_number,
            message: form.message,
            followup_id,
        })
    }
}

#[derive(Debug, Deserialize)]
/// Payload for `POST /api/send-whatsapp`.
pub struct SendWhatsAppForm {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub message: String,
}

impl SendWhatsAppForm {
    pub fn validate_required(&self) -> Result<(), FormError> {
        if self.to.trim().is_empty() || self.message.trim().is_empty() {
            return Err(FormError::Missing("Recipient and message"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Payload for `POST /api/followups/generate-message`.
pub struct GenerateMessageForm {
    #[validate(length(min = 1, max = 255))]
    pub customer_name: String,
    /// Kept as text; kinds without a dedicated template get a generic one.
    pub followup_type: String,
    /// Amounts arrive either as numbers or as preformatted strings.
    #[serde(default)]
    pub payment_amount: Option<serde_json::Value>,
    #[serde(default)]
    pub payment_due_date: Option<String>,
    pub method: FollowupMethod,
}
