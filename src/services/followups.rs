use crate::domain::auth::AuthenticatedUser;
use crate::domain::followup::{FollowupWithRelations, UpdateFollowupStatus};
use crate::domain::types::{FollowupId, UserId};
use crate::forms::followups::{AddFollowupForm, UpdateFollowupForm};
use crate::repository::{CustomerReader, FollowupReader, FollowupWriter, PaymentReader};
use crate::services::payments::owned_customer;
use crate::services::{ServiceError, ServiceResult, current_user_id};

fn load_with_relations<R>(
    repo: &R,
    id: FollowupId,
    user_id: &UserId,
) -> ServiceResult<FollowupWithRelations>
where
    R: FollowupReader + ?Sized,
{
    repo.get_followup_by_id(id, user_id)
        .map_err(|err| {
            log::error!("Failed to load follow-up {id}: {err}");
            ServiceError::from(err)
        })?
        .ok_or_else(|| ServiceError::NotFound("Follow-up not found".to_string()))
}

/// Schedules a follow-up for one of the caller's customers and, optionally,
/// one of their payments.
pub fn create_followup<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddFollowupForm,
) -> ServiceResult<FollowupWithRelations>
where
    R: CustomerReader + PaymentReader + FollowupReader + FollowupWriter + ?Sized,
{
    let user_id = current_user_id(user)?;

    let new_followup = form.into_new_followup(user_id.clone()).map_err(|err| {
        log::error!("Failed to validate follow-up: {err}");
        ServiceError::from(err)
    })?;

    owned_customer(repo, new_followup.customer_id, &user_id)?;
    if let Some(payment_id) = new_followup.payment_id {
        let payment = repo.get_payment_by_id(payment_id, &user_id).map_err(|err| {
            log::error!("Failed to load payment {payment_id}: {err}");
            ServiceError::from(err)
        })?;
        if payment.is_none() {
            return Err(ServiceError::NotFound("Payment not found".to_string()));
        }
    }

    let followup = repo.create_followup(&new_followup).map_err(|err| {
        log::error!("Failed to save follow-up: {err}");
        ServiceError::from(err)
    })?;

    load_with_relations(repo, followup.id, &user_id)
}

pub fn list_followups<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<Vec<FollowupWithRelations>>
where
    R: FollowupReader + ?Sized,
{
    let user_id = current_user_id(user)?;

    repo.list_followups(&user_id).map_err(|err| {
        log::error!("Failed to list follow-ups: {err}");
        ServiceError::from(err)
    })
}

pub fn update_followup<R>(
    repo: &R,
    user: &AuthenticatedUser,
    followup_id: i32,
    form: UpdateFollowupForm,
) -> ServiceResult<FollowupWithRelations>
where
    R: FollowupReader + FollowupWriter + ?Sized,
{
    let user_id = current_user_id(user)?;
    let followup_id = FollowupId::new(followup_id)
        .map_err(|_| ServiceError::NotFound("Follow-up not found".to_string()))?;
    let update = UpdateFollowupStatus::try_from(form).map_err(ServiceError::from)?;

    repo.update_followup_status(followup_id, &user_id, &update)
        .map_err(|err| {
            log::error!("Failed to update follow-up {followup_id}: {err}");
            match ServiceError::from(err) {
                ServiceError::NotFound(_) => {
                    ServiceError::NotFound("Follow-up not found".to_string())
                }
                other => other,
            }
        })?;

    load_with_relations(repo, followup_id, &user_id)
}
