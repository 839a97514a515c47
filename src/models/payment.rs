use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::payment::{
    NewPayment as DomainNewPayment, Payment as DomainPayment,
    UpdatePaymentStatus as DomainUpdatePaymentStatus,
};
use crate::domain::types::{Amount, CustomerId, PaymentId, TypeConstraintError, UserId};
use crate::models::customer::Customer;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::payments)]
#[diesel(belongs_to(Customer, foreign_key = customer_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::payment::Payment`].
pub struct Payment {
    pub id: i32,
    pub user_id: String,
    pub customer_id: i32,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub paid_date: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub invoice_number: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::payments)]
/// Insertable form of [`Payment`].
pub struct NewPayment<'a> {
    pub user_id: &'a str,
    pub customer_id: i32,
    pub amount: f64,
    pub currency: &'a str,
    pub status: &'a str,
    pub due_date: Option<NaiveDate>,
    pub description: Option<&'a str>,
    pub invoice_number: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::payments)]
#[diesel(treat_none_as_null = true)]
/// Status columns written when a payment changes state.
pub struct UpdatePaymentStatus<'a> {
    pub status: &'a str,
    pub paid_date: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Payment> for DomainPayment {
    type Error = TypeConstraintError;

    fn try_from(payment: Payment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PaymentId::try_from(payment.id)?,
            user_id: UserId::new(payment.user_id)?,
            customer_id: CustomerId::try_from(payment.customer_id)?,
            amount: Amount::new(payment.amount)?,
            currency: payment.currency,
            status: payment.status.parse()?,
            due_date: payment.due_date,
            paid_date: payment.paid_date,
            description: payment.description,
            invoice_number: payment.invoice_number,
            created_at: payment.created_at,
            updated_at: payment.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewPayment> for NewPayment<'a> {
    fn from(payment: &'a DomainNewPayment) -> Self {
        Self {
            user_id: payment.user_id.as_str(),
            customer_id: payment.customer_id.get(),
            amount: payment.amount.get(),
            currency: payment.currency.as_str(),
            status: payment.status.as_str(),
            due_date: payment.due_date,
            description: payment.description.as_deref(),
            invoice_number: payment.invoice_number.as_deref(),
        }
    }
}

impl<'a> UpdatePaymentStatus<'a> {
    pub fn new(update: &'a DomainUpdatePaymentStatus, now: NaiveDateTime) -> Self {
        Self {
            status: update.status.as_str(),
            paid_date: update.paid_date,
            updated_at: now,
        }
    }
}
