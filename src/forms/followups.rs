use serde::Deserialize;
use validator::Validate;

use crate::domain::followup::{NewFollowup, UpdateFollowupStatus};
use crate::domain::types::{
    CustomerId, FollowupMethod, FollowupStatus, FollowupType, PaymentId, UserId,
};
use crate::forms::{FormError, parse_datetime, parse_optional_datetime};

#[derive(Debug, Deserialize, Validate)]
/// Payload for `POST /api/followups`.
pub struct AddFollowupForm {
    pub customer_id: i32,
    #[serde(default)]
    pub payment_id: Option<i32>,
    #[serde(rename = "type")]
    pub followup_type: FollowupType,
    pub scheduled_date: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub message: String,
    pub method: FollowupMethod,
}

impl AddFollowupForm {
    pub fn into_new_followup(self, user_id: UserId) -> Result<NewFollowup, FormError> {
        self.validate()?;

        let customer_id =
            CustomerId::new(self.customer_id).map_err(|_| FormError::InvalidCustomerId)?;
        // Clients send 0 for "no payment".
        let payment_id = match self.payment_id {
            Some(id) if id != 0 => {
                Some(PaymentId::new(id).map_err(|_| FormError::InvalidPaymentId)?)
            }
            _ => None,
        };

        Ok(NewFollowup {
            user_id,
            customer_id,
            payment_id,
            followup_type: self.followup_type,
            scheduled_date: parse_datetime(&self.scheduled_date)?,
            message: self.message.trim().to_string(),
            method: self.method,
        })
    }
}

#[derive(Debug, Deserialize)]
/// Payload for `PATCH /api/followups/{id}`.
pub struct UpdateFollowupForm {
    pub status: FollowupStatus,
    #[serde(default)]
    pub completed_date: Option<String>,
}

impl TryFrom<UpdateFollowupForm> for UpdateFollowupStatus {
    type Error = FormError;

    fn try_from(form: UpdateFollowupForm) -> Result<Self, Self::Error> {
        Ok(Self {
            status: form.status,
            completed_date: parse_optional_datetime(form.completed_date.as_deref())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_type_field() {
        let form: AddFollowupForm = serde_json::from_value(serde_json::json!({
            "customer_id": 2,
            "payment_id": 0,
            "type": "overdue_notice",
            "scheduled_date": "2025-09-01T10:00",
            "message": " Pay up ",
            "method": "sms"
        }))
        .unwrap();

        let followup = form.into_new_followup(UserId::new("u").unwrap()).unwrap();
        assert_eq!(followup.followup_type, FollowupType::OverdueNotice);
        assert_eq!(followup.payment_id, None);
        assert_eq!(followup.message, "Pay up");
        assert_eq!(followup.method, FollowupMethod::Sms);
    }

    #[test]
    fn rejects_unknown_method() {
        let result: Result<AddFollowupForm, _> = serde_json::from_value(serde_json::json!({
            "customer_id": 2,
            "type": "general_followup",
            "scheduled_date": "2025-09-01",
            "method": "pigeon"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_bad_schedule() {
        let form = AddFollowupForm {
            customer_id: 1,
            payment_id: None,
            followup_type: FollowupType::GeneralFollowup,
            scheduled_date: "soon".into(),
            message: String::new(),
            method: FollowupMethod::Email,
        };
        assert!(matches!(
            form.into_new_followup(UserId::new("u").unwrap()),
            Err(FormError::InvalidDate(_))
        ));
    }
}
