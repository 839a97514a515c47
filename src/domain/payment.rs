use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerSummary;
use crate::domain::types::{Amount, CustomerId, PaymentId, PaymentStatus, UserId};

/// Currency used when the caller does not pick one.
pub const DEFAULT_CURRENCY: &str = "TZS";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: PaymentId,
    pub user_id: UserId,
    pub customer_id: CustomerId,
    pub amount: Amount,
    pub currency: String,
    pub status: PaymentStatus,
    pub due_date: Option<NaiveDate>,
    pub paid_date: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub invoice_number: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payment row together with the customer it belongs to.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PaymentWithCustomer {
    #[serde(flatten)]
    pub payment: Payment,
    pub customer: Option<CustomerSummary>,
}

/// Compact payment view embedded in follow-ups.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PaymentSummary {
    pub id: PaymentId,
    pub amount: Amount,
    pub status: PaymentStatus,
    pub due_date: Option<NaiveDate>,
    pub invoice_number: Option<String>,
}

impl From<&Payment> for PaymentSummary {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id,
            amount: payment.amount,
            status: payment.status,
            due_date: payment.due_date,
            invoice_number: payment.invoice_number.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewPayment {
    pub user_id: UserId,
    pub customer_id: CustomerId,
    pub amount: Amount,
    pub currency: String,
    pub status: PaymentStatus,
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub invoice_number: Option<String>,
}

/// Status transition applied through `PATCH /api/payments/{id}`.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdatePaymentStatus {
    pub status: PaymentStatus,
    pub paid_date: Option<NaiveDateTime>,
}
