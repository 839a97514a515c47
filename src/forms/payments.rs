use serde::Deserialize;
use validator::Validate;

use crate::domain::payment::{DEFAULT_CURRENCY, NewPayment, UpdatePaymentStatus};
use crate::domain::types::{Amount, CustomerId, PaymentStatus, UserId, non_blank};
use crate::forms::{FormError, parse_date, parse_optional_datetime};

#[derive(Debug, Deserialize, Validate)]
/// Payload for `POST /api/payments`.
pub struct AddPaymentForm {
    pub customer_id: i32,
    pub amount: f64,
    #[serde(default)]
    #[validate(length(max = 8))]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub invoice_number: Option<String>,
}

impl AddPaymentForm {
    pub fn into_new_payment(self, user_id: UserId) -> Result<NewPayment, FormError> {
        self.validate()?;

        let customer_id =
            CustomerId::new(self.customer_id).map_err(|_| FormError::InvalidCustomerId)?;
        let amount = Amount::new(self.amount)?;
        let status = match non_blank(self.status) {
            Some(status) => status.parse::<PaymentStatus>()?,
            None => PaymentStatus::default(),
        };
        let due_date = non_blank(self.due_date)
            .map(|d| parse_date(&d))
            .transpose()?;

        Ok(NewPayment {
            user_id,
            customer_id,
            amount,
            currency: non_blank(self.currency)
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            status,
            due_date,
            description: non_blank(self.description),
            invoice_number: non_blank(self.invoice_number),
        })
    }
}

#[derive(Debug, Deserialize)]
/// Payload for `PATCH /api/payments/{id}`.
pub struct UpdatePaymentForm {
    pub status: String,
    #[serde(default)]
    pub paid_date: Option<String>,
}

impl TryFrom<UpdatePaymentForm> for UpdatePaymentStatus {
    type Error = FormError;

    fn try_from(form: UpdatePaymentForm) -> Result<Self, Self::Error> {
        Ok(Self {
            status: form.status.trim().parse::<PaymentStatus>()?,
            paid_date: parse_optional_datetime(form.paid_date.as_deref())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn form() -> AddPaymentForm {
        AddPaymentForm {
            customer_id: 4,
            amount: 250000.0,
            currency: None,
            status: None,
            due_date: Some("2025-07-01".into()),
            description: Some("  ".into()),
            invoice_number: Some("INV-001".into()),
        }
    }

    #[test]
    fn defaults_currency_and_status() {
        let payment = form()
            .into_new_payment(UserId::new("u1").unwrap())
            .unwrap();
        assert_eq!(payment.currency, "TZS");
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.due_date, NaiveDate::from_ymd_opt(2025, 7, 1));
        assert_eq!(payment.description, None);
        assert_eq!(payment.invoice_number.as_deref(), Some("INV-001"));
    }

    #[test]
    fn rejects_negative_amount_and_bad_customer() {
        let negative = AddPaymentForm {
            amount: -1.0,
            ..form()
        };
        assert!(matches!(
            negative.into_new_payment(UserId::new("u1").unwrap()),
            Err(FormError::InvalidAmount)
        ));

        let no_customer = AddPaymentForm {
            customer_id: 0,
            ..form()
        };
        assert!(matches!(
            no_customer.into_new_payment(UserId::new("u1").unwrap()),
            Err(FormError::InvalidCustomerId)
        ));
    }

    #[test]
    fn update_rejects_unknown_status() {
        let update = UpdatePaymentForm {
            status: "refunded".into(),
            paid_date: None,
        };
        assert!(UpdatePaymentStatus::try_from(update).is_err());

        let update = UpdatePaymentForm {
            status: "paid".into(),
            paid_date: Some("2025-07-02T08:00:00Z".into()),
        };
        let update = UpdatePaymentStatus::try_from(update).unwrap();
        assert_eq!(update.status, PaymentStatus::Paid);
        assert!(update.paid_date.is_some());
    }
}
