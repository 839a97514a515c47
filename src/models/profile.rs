//! Diesel models for per-user profile settings.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::profile::{Profile as DomainProfile, UpsertProfile as DomainUpsertProfile};
use crate::domain::types::{TypeConstraintError, UserId};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::profiles)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Profile {
    pub user_id: String,
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

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::profiles)]
#[diesel(primary_key(user_id))]
#[diesel(treat_none_as_null = true)]
/// Row written by the settings upsert; `None` clears the column.
pub struct UpsertProfile<'a> {
    pub user_id: &'a str,
    pub business_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub nextsms_username: Option<&'a str>,
    pub nextsms_password: Option<&'a str>,
    pub nextsms_sender_id: Option<&'a str>,
    pub whatsapp_token: Option<&'a str>,
    pub whatsapp_phone_id: Option<&'a str>,
    pub whatsapp_business_number: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Profile> for DomainProfile {
    type Error = TypeConstraintError;

    fn try_from(profile: Profile) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId::new(profile.user_id)?,
            business_name: profile.business_name,
            email: profile.email,
            phone: profile.phone,
            nextsms_username: profile.nextsms_username,
            nextsms_password: profile.nextsms_password,
            nextsms_sender_id: profile.nextsms_sender_id,
            whatsapp_token: profile.whatsapp_token,
            whatsapp_phone_id: profile.whatsapp_phone_id,
            whatsapp_business_number: profile.whatsapp_business_number,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        })
    }
}

impl<'a> UpsertProfile<'a> {
    pub fn new(profile: &'a DomainUpsertProfile, now: NaiveDateTime) -> Self {
        Self {
            user_id: profile.user_id.as_str(),
            business_name: profile.business_name.as_deref(),
            email: profile.email.as_deref(),
            phone: profile.phone.as_deref(),
            nextsms_username: profile.nextsms_username.as_deref(),
            nextsms_password: profile.nextsms_password.as_deref(),
            nextsms_sender_id: profile.nextsms_sender_id.as_deref(),
            whatsapp_token: profile.whatsapp_token.as_deref(),
            whatsapp_phone_id: profile.whatsapp_phone_id.as_deref(),
            whatsapp_business_number: profile.whatsapp_business_number.as_deref(),
            updated_at: now,
        }
    }
}
