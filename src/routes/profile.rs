use actix_web::{HttpResponse, get, put, web};

use crate::domain::auth::AuthenticatedUser;
use crate::forms::profile::ProfileForm;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::profile as service;

#[get("/profile")]
pub async fn show_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let profile = service::get_profile(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(profile))
}

#[put("/profile")]
pub async fn save_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<ProfileForm>,
) -> Result<HttpResponse, ServiceError> {
    let profile = service::save_profile(repo.get_ref(), &user, form.into_inner())?;
    Ok(HttpResponse::Ok().json(profile))
}

#[get("/profile/sms-status")]
pub async fn sms_status(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> HttpResponse {
    HttpResponse::Ok().json(service::sms_status(repo.get_ref(), &user))
}
