use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerSummary;
use crate::domain::payment::PaymentSummary;
use crate::domain::types::{
    CustomerId, FollowupId, FollowupMethod, FollowupStatus, FollowupType, PaymentId, UserId,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Followup {
    pub id: FollowupId,
    pub user_id: UserId,
    pub customer_id: CustomerId,
    pub payment_id: Option<PaymentId>,
    #[serde(rename = "type")]
    pub followup_type: FollowupType,
    pub status: FollowupStatus,
    pub scheduled_date: NaiveDateTime,
    pub completed_date: Option<NaiveDateTime>,
    pub message: String,
    pub method: FollowupMethod,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Follow-up row with the customer and optional payment it refers to.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct FollowupWithRelations {
    #[serde(flatten)]
    pub followup: Followup,
    pub customer: Option<CustomerSummary>,
    pub payment: Option<PaymentSummary>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewFollowup {
    pub user_id: UserId,
    pub customer_id: CustomerId,
    pub payment_id: Option<PaymentId>,
    pub followup_type: FollowupType,
    pub scheduled_date: NaiveDateTime,
    pub message: String,
    pub method: FollowupMethod,
}

impl NewFollowup {
    /// Every follow-up starts out scheduled.
    pub const fn status(&self) -> FollowupStatus {
        FollowupStatus::Scheduled
    }
}

/// Status transition applied through `PATCH /api/followups/{id}`.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateFollowupStatus {
    pub status: FollowupStatus,
    pub completed_date: Option<NaiveDateTime>,
}
