use serde::Deserialize;
use validator::Validate;

use crate::domain::profile::UpsertProfile;
use crate::domain::types::{UserId, non_blank};
use crate::forms::FormError;

#[derive(Debug, Default, Deserialize, Validate)]
/// Payload for `PUT /api/profile`. Blank fields clear the stored value.
pub struct ProfileForm {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub business_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub phone: Option<String>,
    #[serde(default)]
    pub nextsms_username: Option<String>,
    #[serde(default)]
    pub nextsms_password: Option<String>,
    #[serde(default)]
    #[validate(length(max = 11))]
    pub nextsms_sender_id: Option<String>,
    #[serde(default)]
    pub whatsapp_token: Option<String>,
    #[serde(default)]
    pub whatsapp_phone_id: Option<String>,
    #[serde(default)]
    pub whatsapp_business_number: Option<String>,
}

impl ProfileForm {
    pub fn into_upsert(self, user_id: UserId) -> Result<UpsertProfile, FormError> {
        self.validate()?;
        Ok(UpsertProfile {
            user_id,
            business_name: non_blank(self.business_name),
            email: non_blank(self.email),
            phone: non_blank(self.phone),
            nextsms_username: non_blank(self.nextsms_username),
            nextsms_password: non_blank(self.nextsms_password),
            nextsms_sender_id: non_blank(self.nextsms_sender_id),
            whatsapp_token: non_blank(self.whatsapp_token),
            whatsapp_phone_id: non_blank(self.whatsapp_phone_id),
            whatsapp_business_number: non_blank(self.whatsapp_business_number),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_become_none() {
        let form = ProfileForm {
            business_name: Some(" Duka Letu ".into()),
            nextsms_username: Some("".into()),
            ..ProfileForm::default()
        };
        let upsert = form.into_upsert(UserId::new("u").unwrap()).unwrap();
        assert_eq!(upsert.business_name.as_deref(), Some("Duka Letu"));
        assert_eq!(upsert.nextsms_username, None);
    }

    #[test]
    fn sender_id_length_is_limited() {
        let form = ProfileForm {
            nextsms_sender_id: Some("ABCDEFGHIJKLMNOP".into()),
            ..ProfileForm::default()
        };
        assert!(matches!(
            form.into_upsert(UserId::new("u").unwrap()),
            Err(FormError::Validation(_))
        ));
    }
}
