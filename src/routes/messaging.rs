use actix_web::{HttpResponse, post, web};

use crate::domain::auth::AuthenticatedUser;
use crate::dto::messaging::SmsSentResponse;
use crate::forms::messaging::{SendSmsForm, SendWhatsAppForm};
use crate::integrations::Integrations;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::messaging as service;

#[post("/send-sms")]
pub async fn send_sms(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    integrations: web::Data<Integrations>,
    form: web::Json<SendSmsForm>,
) -> Result<HttpResponse, ServiceError> {
    let sent = service::send_sms(
        repo.get_ref(),
        integrations.sms.as_ref(),
        &user,
        form.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(SmsSentResponse::from(sent)))
}

#[post("/send-whatsapp")]
pub async fn send_whatsapp(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    integrations: web::Data<Integrations>,
    form: web::Json<SendWhatsAppForm>,
) -> Result<HttpResponse, ServiceError> {
    let reply = service::send_whatsapp(
        repo.get_ref(),
        integrations.whatsapp.as_ref(),
        &user,
        form.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(reply))
}
