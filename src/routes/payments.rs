use actix_web::{HttpResponse, get, patch, post, web};

use crate::domain::auth::AuthenticatedUser;
use crate::forms::payments::{AddPaymentForm, UpdatePaymentForm};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::payments as service;

#[get("/payments")]
pub async fn list_payments(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let payments = service::list_payments(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(payments))
}

#[post("/payments")]
pub async fn add_payment(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddPaymentForm>,
) -> Result<HttpResponse, ServiceError> {
    let payment = service::create_payment(repo.get_ref(), &user, form.into_inner())?;
    Ok(HttpResponse::Ok().json(payment))
}

#[patch("/payments/{payment_id}")]
pub async fn update_payment(
    payment_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<UpdatePaymentForm>,
) -> Result<HttpResponse, ServiceError> {
    let payment = service::update_payment(
        repo.get_ref(),
        &user,
        payment_id.into_inner(),
        form.into_inner(),
    )?;
    Ok(HttpResponse::Ok().json(payment))
}
