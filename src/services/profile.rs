use crate::domain::auth::AuthenticatedUser;
use crate::dto::profile::{ProfileView, SmsStatus};
use crate::forms::profile::ProfileForm;
use crate::repository::{ProfileReader, ProfileWriter};
use crate::services::{ServiceError, ServiceResult, current_user_id};

/// Returns the caller's settings without gateway secrets.
pub fn get_profile<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<ProfileView>
where
    R: ProfileReader + ?Sized,
{
    let user_id = current_user_id(user)?;

    let profile = repo.get_profile(&user_id).map_err(|err| {
        log::error!("Failed to load profile: {err}");
        ServiceError::from(err)
    })?;

    Ok(profile
        .map(ProfileView::from)
        .unwrap_or_else(|| ProfileView::empty(user_id.as_str())))
}

/// Replaces the caller's settings.
pub fn save_profile<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ProfileForm,
) -> ServiceResult<ProfileView>
where
    R: ProfileWriter + ?Sized,
{
    let user_id = current_user_id(user)?;

    let upsert = form.into_upsert(user_id).map_err(|err| {
        log::error!("Failed to validate profile: {err}");
        ServiceError::from(err)
    })?;

    let profile = repo.upsert_profile(&upsert).map_err(|err| {
        log::error!("Failed to save profile: {err}");
        ServiceError::from(err)
    })?;

    log::info!("Profile saved for {}", profile.user_id);
    Ok(profile.into())
}

/// Whether SMS credentials are stored. Lookup failures read as not configured.
pub fn sms_status<R>(repo: &R, user: &AuthenticatedUser) -> SmsStatus
where
    R: ProfileReader + ?Sized,
{
    let configured = current_user_id(user)
        .ok()
        .and_then(|user_id| match repo.get_profile(&user_id) {
            Ok(profile) => profile,
            Err(err) => {
                log::warn!("SMS status lookup failed: {err}");
                None
            }
        })
        .is_some_and(|profile| profile.sms_credentials().is_some());

    SmsStatus { configured }
}
