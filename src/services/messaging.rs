//! Outbound SMS and WhatsApp delivery using the caller's own gateway
//! credentials.

use chrono::Utc;
use serde_json::Value;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::followup::UpdateFollowupStatus;
use crate::domain::profile::Profile;
use crate::domain::types::{FollowupId, FollowupStatus, UserId};
use crate::forms::messaging::{SendSmsForm, SendWhatsAppForm, SmsRequest};
use crate::integrations::{SmsGateway, WhatsAppGateway};
use crate::repository::{FollowupWriter, ProfileReader};
use crate::services::{ServiceError, ServiceResult, current_user_id};

/// Normalises a Tanzanian number to `255XXXXXXXXX`.
///
/// Everything except digits and `+` is dropped, a leading `+` is removed and
/// a leading trunk `0` becomes the `255` country code.
pub fn format_phone_number(raw: &str) -> ServiceResult<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    let formatted = if let Some(rest) = cleaned.strip_prefix("+255") {
        format!("255{rest}")
    } else if let Some(rest) = cleaned.strip_prefix('0') {
        format!("255{rest}")
    } else {
        cleaned
    };

    if formatted.starts_with("255")
        && formatted.len() >= 12
        && formatted.chars().all(|c| c.is_ascii_digit())
    {
        Ok(formatted)
    } else {
        Err(ServiceError::Form("Invalid phone number format".to_string()))
    }
}

fn load_profile<R>(repo: &R, user_id: &UserId) -> ServiceResult<Option<Profile>>
where
    R: ProfileReader + ?Sized,
{
    repo.get_profile(user_id).map_err(|err| {
        log::error!("Failed to load profile: {err}");
        ServiceError::from(err)
    })
}

/// Gateway acknowledgement for an accepted SMS.
#[derive(Debug, Clone, PartialEq)]
pub struct SmsSent {
    pub data: Value,
    pub formatted_number: String,
}

fn mark_followup_sent<R>(repo: &R, id: FollowupId, user_id: &UserId)
where
    R: FollowupWriter + ?Sized,
{
    let update = UpdateFollowupStatus {
        status: FollowupStatus::Sent,
        completed_date: Some(Utc::now().naive_utc()),
    };
    if let Err(err) = repo.update_followup_status(id, user_id, &update) {
        log::error!("SMS sent but follow-up {id} could not be marked sent: {err}");
    }
}

/// Sends an SMS through NextSMS and marks the linked follow-up as sent once
/// the gateway accepts it.
pub async fn send_sms<R, G>(
    repo: &R,
    gateway: &G,
    user: &AuthenticatedUser,
    form: SendSmsForm,
) -> ServiceResult<SmsSent>
where
    R: ProfileReader + FollowupWriter + ?Sized,
    G: SmsGateway + ?Sized,
{
    let user_id = current_user_id(user)?;
    let request = SmsRequest::try_from(form).map_err(ServiceError::from)?;
    let formatted_number = format_phone_number(&request.phone_number)?;

    let profile = load_profile(repo, &user_id)?.ok_or_else(|| {
        ServiceError::NotFound(
            "Profile not found. Please configure your settings first.".to_string(),
        )
    })?;
    let credentials = profile.sms_credentials().ok_or_else(|| {
        ServiceError::Form(
            "NextSMS credentials not configured. Please add your NextSMS username and password in Settings."
                .to_string(),
        )
    })?;

    let response = gateway
        .send_sms(&credentials, &formatted_number, &request.message)
        .await
        .map_err(|err| {
            log::error!("NextSMS request failed: {err}");
            ServiceError::from(err)
        })?;

    if !response.is_success() {
        log::error!("NextSMS rejected message with status {}", response.status);
        return Err(ServiceError::Upstream {
            status: response.status,
            message: "Failed to send SMS".to_string(),
            details: response.body,
        });
    }

    if let Some(id) = request.followup_id {
        mark_followup_sent(repo, id, &user_id);
    }

    log::info!("SMS sent to {formatted_number}");
    Ok(SmsSent {
        data: response.body,
        formatted_number,
    })
}

/// Sends a WhatsApp text message and returns the Graph API reply.
pub async fn send_whatsapp<R, G>(
    repo: &R,
    gateway: &G,
    user: &AuthenticatedUser,
    form: SendWhatsAppForm,
) -> ServiceResult<Value>
where
    R: ProfileReader + ?Sized,
    G: WhatsAppGateway + ?Sized,
{
    let user_id = current_user_id(user)?;
    form.validate_required().map_err(ServiceError::from)?;

    let profile = load_profile(repo, &user_id)?
        .ok_or_else(|| ServiceError::Form("WhatsApp settings not configured".to_string()))?;
    let credentials = profile
        .whatsapp_credentials()
        .ok_or_else(|| ServiceError::Form("WhatsApp settings missing".to_string()))?;

    let response = gateway
        .send_text(&credentials, form.to.trim(), &form.message)
        .await
        .map_err(|err| {
            log::error!("WhatsApp request failed: {err}");
            ServiceError::from(err)
        })?;

    if !response.is_success() {
        log::error!("WhatsApp rejected message with status {}", response.status);
        return Err(ServiceError::Upstream {
            status: response.status,
            message: "Failed to send WhatsApp message".to_string(),
            details: response.body,
        });
    }

    Ok(response.body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_local_and_international_numbers() {
        assert_eq!(format_phone_number("0712 345 678").unwrap(), "255712345678");
        assert_eq!(format_phone_number("+255-712-345-678").unwrap(), "255712345678");
        assert_eq!(format_phone_number(" 255712345678 ").unwrap(), "255712345678");
    }

    #[test]
    fn rejects_foreign_or_short_numbers() {
        assert!(format_phone_number("+254712345678").is_err());
        assert!(format_phone_number("25571234").is_err());
        assert!(format_phone_number("").is_err());
        assert!(format_phone_number("255+712345678").is_err());
    }
}
