//! Profile payloads returned to the browser.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::profile::Profile;

/// Profile settings with gateway secrets replaced by `*_configured` flags.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProfileView {
    pub user_id: String,
    pub business_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub nextsms_username: Option<String>,
    pub nextsms_sender_id: Option<String>,
    pub nextsms_configured: bool,
    pub whatsapp_phone_id: Option<String>,
    pub whatsapp_business_number: Option<String>,
    pub whatsapp_configured: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl ProfileView {
    /// View for a user who has not saved any settings yet.
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            business_name: None,
            email: None,
            phone: None,
            nextsms_username: None,
            nextsms_sender_id: None,
            nextsms_configured: false,
            whatsapp_phone_id: None,
            whatsapp_business_number: None,
            whatsapp_configured: false,
            created_at: None,
            updated_at: None,
        }
    }
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        let nextsms_configured = profile.sms_credentials().is_some();
        let whatsapp_configured = profile.whatsapp_credentials().is_some();
        Self {
            user_id: profile.user_id.into_inner(),
            business_name: profile.business_name,
            email: profile.email,
            phone: profile.phone,
            nextsms_username: profile.nextsms_username,
            nextsms_sender_id: profile.nextsms_sender_id,
            nextsms_configured,
            whatsapp_phone_id: profile.whatsapp_phone_id,
            whatsapp_business_number: profile.whatsapp_business_number,
            whatsapp_configured,
            created_at: Some(profile.created_at),
            updated_at: Some(profile.updated_at),
        }
    }
}

/// Response of `GET /api/profile/sms-status`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SmsStatus {
    pub configured: bool,
}
