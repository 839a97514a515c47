//! Per-user settings: business details and messaging gateway credentials.

use chrono::NaiveDateTime;

use crate::domain::types::{UserId, non_blank};

#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub user_id: UserId,
    pub business_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub nextsms_username: Option<String>,
    pub nextsms_password: Option<String>,
    pub nextsms_sender_id: Option<String>,
    pub whatsapp_token: Option<String>,
    pub whatsapp_phone_id: Option<String>,
    pub whatsapp_business_number: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Credentials required to talk to the NextSMS gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmsCredentials {
    pub username: String,
    pub password: String,
    pub sender_id: Option<String>,
}

/// Credentials required to talk to the WhatsApp Cloud API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WhatsAppCredentials {
    pub token: String,
    pub phone_id: String,
}

impl Profile {
    /// Returns the NextSMS credentials when both username and password are set.
    pub fn sms_credentials(&self) -> Option<SmsCredentials> {
        let username = non_blank(self.nextsms_username.clone())?;
        let password = non_blank(self.nextsms_password.clone())?;
        Some(SmsCredentials {
            username,
            password,
            sender_id: non_blank(self.nextsms_sender_id.clone()),
        })
    }

    /// Returns the WhatsApp credentials when both token and phone id are set.
    pub fn whatsapp_credentials(&self) -> Option<WhatsAppCredentials> {
        Some(WhatsAppCredentials {
            token: non_blank(self.whatsapp_token.clone())?,
            phone_id: non_blank(self.whatsapp_phone_id.clone())?,
        })
    }
}

/// Full replacement of the editable profile settings.
#[derive(Clone, Debug, PartialEq)]
pub struct UpsertProfile {
    pub user_id: UserId,
    pub business_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub nextsms_username: Option<String>,
    pub nextsms_password: Option<String>,
    pub nextsms_sender_id: Option<String>,
    pub whatsapp_token: Option<String>,
    pub whatsapp_phone_id: Option<String>,
    pub whatsapp_business_number: Option<String>,
}
