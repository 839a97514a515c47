use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, get, post, web};

use crate::domain::auth::AuthenticatedUser;
use crate::dto::customers::{CustomersResponse, VoiceNothingFound, VoiceUploadResponse};
use crate::forms::customers::{AddCustomerForm, CustomerListParams};
use crate::forms::uploads::{UploadAudioForm, UploadCustomersCsvForm, UploadImageForm};
use crate::integrations::Integrations;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::customers as service;
use crate::services::intake::{self, VoiceIntake};

#[get("/customers")]
pub async fn list_customers(
    params: web::Query<CustomerListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let customers = service::list_customers(repo.get_ref(), &user, params.into_inner())?;
    Ok(HttpResponse::Ok().json(customers))
}

#[post("/customers")]
pub async fn add_customer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddCustomerForm>,
) -> Result<HttpResponse, ServiceError> {
    let customer = service::create_customer(repo.get_ref(), &user, form.into_inner())?;
    Ok(HttpResponse::Ok().json(customer))
}

#[post("/customers/csv-upload")]
pub async fn upload_customers_csv(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(mut form): MultipartForm<UploadCustomersCsvForm>,
) -> Result<HttpResponse, ServiceError> {
    let customers = service::import_customers_csv(repo.get_ref(), &user, &mut form)?;
    Ok(HttpResponse::Ok().json(CustomersResponse { customers }))
}

#[post("/customers/ocr-upload")]
pub async fn upload_customers_image(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    integrations: web::Data<Integrations>,
    MultipartForm(mut form): MultipartForm<UploadImageForm>,
) -> Result<HttpResponse, ServiceError> {
    let image = form.read()?;
    let customers = intake::import_customers_from_image(
        repo.get_ref(),
        integrations.predictions.as_deref(),
        &user,
        image,
    )
    .await?;
    Ok(HttpResponse::Ok().json(CustomersResponse { customers }))
}

#[post("/customers/voice-upload")]
pub async fn upload_customers_voice(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    integrations: web::Data<Integrations>,
    MultipartForm(mut form): MultipartForm<UploadAudioForm>,
) -> Result<HttpResponse, ServiceError> {
    let audio = form.read()?;
    let outcome = intake::import_customers_from_voice(
        repo.get_ref(),
        integrations.predictions.as_deref(),
        &user,
        audio,
    )
    .await?;

    Ok(match outcome {
        VoiceIntake::Created {
            customers,
            transcription,
        } => HttpResponse::Ok().json(VoiceUploadResponse {
            customers,
            transcription,
        }),
        VoiceIntake::NothingFound { transcription } => {
            HttpResponse::BadRequest().json(VoiceNothingFound {
                error: "No customer information found in voice recording",
                transcription,
            })
        }
    })
}
