use chrono::{NaiveDateTime, Utc};

use crate::domain::auth::AuthenticatedUser;
use crate::domain::dashboard::DashboardStats;
use crate::repository::{CustomerListQuery, CustomerReader, FollowupReader, PaymentReader};
use crate::services::{ServiceError, ServiceResult, current_user_id};

/// Builds the dashboard report for the caller as of `now`.
pub fn dashboard_stats_at<R>(
    repo: &R,
    user: &AuthenticatedUser,
    now: NaiveDateTime,
) -> ServiceResult<DashboardStats>
where
    R: CustomerReader + PaymentReader + FollowupReader + ?Sized,
{
    let user_id = current_user_id(user)?;

    let customers = repo
        .list_customers(CustomerListQuery::new(user_id.clone()))
        .map_err(|err| {
            log::error!("Failed to load customers for dashboard: {err}");
            ServiceError::from(err)
        })?;
    let payments = repo
        .list_payments(&user_id)
        .map_err(|err| {
            log::error!("Failed to load payments for dashboard: {err}");
            ServiceError::from(err)
        })?
        .into_iter()
        .map(|p| p.payment)
        .collect::<Vec<_>>();
    let followups = repo
        .list_followups(&user_id)
        .map_err(|err| {
            log::error!("Failed to load follow-ups for dashboard: {err}");
            ServiceError::from(err)
        })?
        .into_iter()
        .map(|f| f.followup)
        .collect::<Vec<_>>();

    Ok(DashboardStats::compute(&customers, &payments, &followups, now))
}

pub fn dashboard_stats<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<DashboardStats>
where
    R: CustomerReader + PaymentReader + FollowupReader + ?Sized,
{
    dashboard_stats_at(repo, user, Utc::now().naive_utc())
}
