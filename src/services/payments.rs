use chrono::Utc;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::customer::CustomerSummary;
use crate::domain::payment::{PaymentWithCustomer, UpdatePaymentStatus};
use crate::domain::types::{CustomerId, PaymentId, UserId};
use crate::forms::payments::{AddPaymentForm, UpdatePaymentForm};
use crate::repository::{CustomerReader, PaymentReader, PaymentWriter};
use crate::services::{ServiceError, ServiceResult, current_user_id};

/// Loads the caller's customer or reports it as missing.
pub(crate) fn owned_customer<R>(
    repo: &R,
    id: CustomerId,
    user_id: &UserId,
) -> ServiceResult<CustomerSummary>
where
    R: CustomerReader + ?Sized,
{
    match repo.get_customer_by_id(id, user_id) {
        Ok(Some(customer)) => Ok(CustomerSummary::from(&customer)),
        Ok(None) => Err(ServiceError::NotFound("Customer not found".to_string())),
        Err(err) => {
            log::error!("Failed to load customer {id}: {err}");
            Err(err.into())
        }
    }
}

pub fn create_payment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddPaymentForm,
) -> ServiceResult<PaymentWithCustomer>
where
    R: CustomerReader + PaymentWriter + ?Sized,
{
    let user_id = current_user_id(user)?;

    let new_payment = form.into_new_payment(user_id.clone()).map_err(|err| {
        log::error!("Failed to validate payment: {err}");
        ServiceError::from(err)
    })?;

    let customer = owned_customer(repo, new_payment.customer_id, &user_id)?;

    let payment = repo.create_payment(&new_payment).map_err(|err| {
        log::error!("Failed to save payment: {err}");
        ServiceError::from(err)
    })?;

    Ok(PaymentWithCustomer {
        payment,
        customer: Some(customer),
    })
}

pub fn list_payments<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<Vec<PaymentWithCustomer>>
where
    R: PaymentReader + ?Sized,
{
    let user_id = current_user_id(user)?;

    repo.list_payments(&user_id).map_err(|err| {
        log::error!("Failed to list payments: {err}");
        ServiceError::from(err)
    })
}

/// Changes the payment status; a payment owned by someone else is reported
/// as not found.
pub fn update_payment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    payment_id: i32,
    form: UpdatePaymentForm,
) -> ServiceResult<PaymentWithCustomer>
where
    R: CustomerReader + PaymentWriter + ?Sized,
{
    let user_id = current_user_id(user)?;
    let payment_id = PaymentId::new(payment_id)
        .map_err(|_| ServiceError::NotFound("Payment not found".to_string()))?;
    let update = UpdatePaymentStatus::try_from(form).map_err(ServiceError::from)?;

    let payment = repo
        .update_payment_status(payment_id, &user_id, &update)
        .map_err(|err| {
            log::error!("Failed to update payment {payment_id}: {err}");
            match ServiceError::from(err) {
                ServiceError::NotFound(_) => {
                    ServiceError::NotFound("Payment not found".to_string())
                }
                other => other,
            }
        })?;

    let customer = repo
        .get_customer_by_id(payment.customer_id, &user_id)
        .map_err(|err| {
            log::error!("Failed to load customer for payment {payment_id}: {err}");
            ServiceError::from(err)
        })?
        .map(|c| CustomerSummary::from(&c));

    log::info!("Payment {payment_id} marked {}", payment.status);
    Ok(PaymentWithCustomer { payment, customer })
}
