use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::followup::{
    Followup as DomainFollowup, NewFollowup as DomainNewFollowup,
    UpdateFollowupStatus as DomainUpdateFollowupStatus,
};
use crate::domain::types::{CustomerId, FollowupId, PaymentId, TypeConstraintError, UserId};
use crate::models::customer::Customer;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::followups)]
#[diesel(belongs_to(Customer, foreign_key = customer_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::followup::Followup`].
pub struct Followup {
    pub id: i32,
    pub user_id: String,
    pub customer_id: i32,
    pub payment_id: Option<i32>,
    pub followup_type: String,
    pub status: String,
    pub scheduled_date: NaiveDateTime,
    pub completed_date: Option<NaiveDateTime>,
    pub message: String,
    pub method: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::followups)]
/// Insertable form of [`Followup`].
pub struct NewFollowup<'a> {
    pub user_id: &'a str,
    pub customer_id: i32,
    pub payment_id: Option<i32>,
    pub followup_type: &'a str,
    pub status: &'a str,
    pub scheduled_date: NaiveDateTime,
    pub message: &'a str,
    pub method: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::followups)]
#[diesel(treat_none_as_null = true)]
/// Status columns written when a follow-up changes state.
pub struct UpdateFollowupStatus<'a> {
    pub status: &'a str,
    pub completed_date: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Followup> for DomainFollowup {
    type Error = TypeConstraintError;

    fn try_from(followup: Followup) -> Result<Self, Self::Error> {
        Ok(Self {
            id: FollowupId::try_from(followup.id)?,
            user_id: UserId::new(followup.user_id)?,
            customer_id: CustomerId::try_from(followup.customer_id)?,
            payment_id: followup.payment_id.map(PaymentId::try_from).transpose()?,
            followup_type: followup.followup_type.parse()?,
            status: followup.status.parse()?,
            scheduled_date: followup.scheduled_date,
            completed_date: followup.completed_date,
            message: followup.message,
            method: followup.method.parse()?,
            created_at: followup.created_at,
            updated_at: followup.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewFollowup> for NewFollowup<'a> {
    fn from(followup: &'a DomainNewFollowup) -> Self {
        Self {
            user_id: followup.user_id.as_str(),
            customer_id: followup.customer_id.get(),
            payment_id: followup.payment_id.map(PaymentId::get),
            followup_type: followup.followup_type.as_str(),
            status: followup.status().as_str(),
            scheduled_date: followup.scheduled_date,
            message: followup.message.as_str(),
            method: followup.method.as_str(),
        }
    }
}

impl<'a> UpdateFollowupStatus<'a> {
    pub fn new(update: &'a DomainUpdateFollowupStatus, now: NaiveDateTime) -> Self {
        Self {
            status: update.status.as_str(),
            completed_date: update.completed_date,
            updated_at: now,
        }
    }
}
