use actix_web::{HttpResponse, get, web};

use crate::domain::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::dashboard as service;

#[get("/dashboard/stats")]
pub async fn dashboard_stats(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let stats = service::dashboard_stats(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(stats))
}
