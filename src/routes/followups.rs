use actix_web::{HttpResponse, get, patch, post, web};

use crate::domain::auth::AuthenticatedUser;
use crate::dto::messaging::GeneratedMessage;
use crate::forms::followups::{AddFollowupForm, UpdateFollowupForm};
use crate::forms::messaging::GenerateMessageForm;
use crate::integrations::Integrations;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::followups as service;
use crate::services::messages;

#[get("/followups")]
pub async fn list_followups(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let followups = service::list_followups(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(followups))
}

#[post("/followups")]
pub async fn add_followup(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddFollowupForm>,
) -> Result<HttpResponse, ServiceError> {
    let followup = service::create_followup(repo.get_ref(), &user, form.into_inner())?;
    Ok(HttpResponse::Ok().json(followup))
}

#[patch("/followups/{followup_id}")]
pub async fn update_followup(
    followup_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<UpdateFollowupForm>,
) -> Result<HttpResponse, ServiceError> {
    let followup = service::update_followup(
        repo.get_ref(),
        &user,
        followup_id.into_inner(),
        form.into_inner(),
    )?;
    Ok(HttpResponse::Ok().json(followup))
}

#[post("/followups/generate-message")]
pub async fn generate_message(
    user: AuthenticatedUser,
    integrations: web::Data<Integrations>,
    form: web::Json<GenerateMessageForm>,
) -> Result<HttpResponse, ServiceError> {
    let message = messages::generate_message(
        integrations.predictions.as_deref(),
        &user,
        form.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(GeneratedMessage { message }))
}
