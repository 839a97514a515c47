//! Manual and CSV customer intake plus listing.

use crate::domain::auth::AuthenticatedUser;
use crate::domain::customer::{Customer, NewCustomer};
use crate::forms::customers::{AddCustomerForm, CustomerListParams};
use crate::forms::uploads::UploadCustomersCsvForm;
use crate::repository::{CustomerListQuery, CustomerReader, CustomerWriter};
use crate::services::{ServiceError, ServiceResult, current_user_id};

/// Persists customers and logs failures.
pub(crate) fn store_customers<R>(repo: &R, customers: &[NewCustomer]) -> ServiceResult<Vec<Customer>>
where
    R: CustomerWriter + ?Sized,
{
    repo.create_customers(customers).map_err(|err| {
        log::error!("Failed to save customers: {err}");
        ServiceError::from(err)
    })
}

/// Validates the payload and stores a single customer.
pub fn create_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddCustomerForm,
) -> ServiceResult<Customer>
where
    R: CustomerWriter + ?Sized,
{
    let user_id = current_user_id(user)?;

    let new_customer = form.into_new_customer(user_id).map_err(|err| {
        log::error!("Failed to validate customer: {err}");
        ServiceError::from(err)
    })?;

    store_customers(repo, &[new_customer])?
        .into_iter()
        .next()
        .ok_or(ServiceError::Internal)
}

/// Lists the caller's customers, newest first, optionally filtered.
pub fn list_customers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: CustomerListParams,
) -> ServiceResult<Vec<Customer>>
where
    R: CustomerReader + ?Sized,
{
    let user_id = current_user_id(user)?;

    let mut query = CustomerListQuery::new(user_id);
    if let Some(search) = params.search {
        query = query.search(search);
    }

    repo.list_customers(query).map_err(|err| {
        log::error!("Failed to list customers: {err}");
        ServiceError::from(err)
    })
}

/// Parses the uploaded CSV file and creates customer records in bulk.
pub fn import_customers_csv<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &mut UploadCustomersCsvForm,
) -> ServiceResult<Vec<Customer>>
where
    R: CustomerWriter + ?Sized,
{
    let user_id = current_user_id(user)?;

    let customers = form.parse(&user_id).map_err(|err| {
        log::error!("Failed to parse customers CSV: {err}");
        ServiceError::from(err)
    })?;

    store_customers(repo, &customers)
}
