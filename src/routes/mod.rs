//! JSON API handlers mounted under `/api`.
//!
//! Handlers extract the caller, call into `services` and serialise the
//! result. Every failure is rendered as `{"error": ..., "details"?: ...}`.

use actix_multipart::MultipartError;
use actix_multipart::form::MultipartFormConfig;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, web};
use serde::Serialize;
use serde_json::Value;

use crate::services::ServiceError;

pub mod customers;
pub mod dashboard;
pub mod followups;
pub mod messaging;
pub mod payments;
pub mod profile;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a Value>,
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Form(_) | ServiceError::TypeConstraint(_) => StatusCode::BAD_REQUEST,
            ServiceError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ServiceError::NotConfigured(_)
            | ServiceError::Repository(_)
            | ServiceError::Integration(_)
            | ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ServiceError::Repository(_) => "Database error".to_string(),
            other => other.to_string(),
        };
        let details = match self {
            ServiceError::Upstream { details, .. } => Some(details),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: &message,
            details,
        })
    }
}

/// Malformed JSON bodies are reported like every other validation error.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ServiceError::Form(err.to_string()).into())
}

/// Upload fields are named after what the handler expects to receive.
fn missing_upload_message(field: &str) -> String {
    match field {
        "image" => "No image provided".to_string(),
        "audio" => "No audio file provided".to_string(),
        _ => "No file provided".to_string(),
    }
}

fn multipart_config() -> MultipartFormConfig {
    MultipartFormConfig::default().error_handler(|err, _req| {
        let message = match &err {
            MultipartError::MissingField(field) => missing_upload_message(field),
            other => other.to_string(),
        };
        ServiceError::Form(message).into()
    })
}

/// Registers every API route on the given scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(multipart_config())
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            ServiceError::Form(err.to_string()).into()
        }))
        .app_data(web::PathConfig::default().error_handler(|err, _req| {
            ServiceError::Form(err.to_string()).into()
        }))
        .service(customers::list_customers)
        .service(customers::add_customer)
        .service(customers::upload_customers_csv)
        .service(customers::upload_customers_image)
        .service(customers::upload_customers_voice)
        .service(payments::list_payments)
        .service(payments::add_payment)
        .service(payments::update_payment)
        .service(followups::generate_message)
        .service(followups::list_followups)
        .service(followups::add_followup)
        .service(followups::update_followup)
        .service(messaging::send_sms)
        .service(messaging::send_whatsapp)
        .service(profile::sms_status)
        .service(profile::show_profile)
        .service(profile::save_profile)
        .service(dashboard::dashboard_stats);
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    async fn body_json(err: ServiceError) -> (StatusCode, Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn maps_errors_to_json_bodies() {
        let (status, body) = body_json(ServiceError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({"error": "Unauthorized"}));

        let (status, body) = body_json(ServiceError::Form("Invalid phone number format".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid phone number format");

        let (status, _) = body_json(ServiceError::NotConfigured("no token".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn upstream_errors_keep_status_and_details() {
        let err = ServiceError::Upstream {
            status: 402,
            message: "Failed to send SMS".into(),
            details: serde_json::json!({"reason": "no credit"}),
        };
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(body["error"], "Failed to send SMS");
        assert_eq!(body["details"]["reason"], "no credit");
    }

    #[test]
    fn missing_uploads_are_named() {
        assert_eq!(missing_upload_message("file"), "No file provided");
        assert_eq!(missing_upload_message("image"), "No image provided");
        assert_eq!(missing_upload_message("audio"), "No audio file provided");
    }
}
