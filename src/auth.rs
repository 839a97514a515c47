//! Bearer token verification for API handlers.
//!
//! Tokens are HS256 JWTs issued by the identity provider. Handlers receive
//! the verified claims by taking an [`AuthenticatedUser`] argument.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::domain::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::services::ServiceError;

/// Shared token verifier registered as application data.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.jwt_secret, config.jwt_audience.as_deref())
    }

    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, ServiceError> {
        decode::<AuthenticatedUser>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                log::warn!("Rejected access token: {err}");
                ServiceError::Unauthorized
            })
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// The identity cookie carries the same token for browser sessions.
fn identity_token(req: &HttpRequest) -> Option<String> {
    req.get_identity().ok()?.id().ok()
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ServiceError> {
    let verifier = req.app_data::<web::Data<JwtVerifier>>().ok_or_else(|| {
        log::error!("JwtVerifier is not registered");
        ServiceError::Internal
    })?;
    let token = bearer_token(req)
        .or_else(|| identity_token(req))
        .ok_or(ServiceError::Unauthorized)?;
    verifier.verify(&token)
}

impl FromRequest for AuthenticatedUser {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    use super::*;

    fn token(secret: &str, claims: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn exp() -> i64 {
        Utc::now().timestamp() + 3600
    }

    #[test]
    fn accepts_valid_token() {
        let verifier = JwtVerifier::new("secret", None);
        let user = verifier
            .verify(&token("secret", json!({"sub": "u-1", "exp": exp(), "aud": "any"})))
            .unwrap();
        assert_eq!(user.sub, "u-1");
        assert_eq!(user.email, None);
    }

    #[test]
    fn rejects_wrong_secret_and_expired_tokens() {
        let verifier = JwtVerifier::new("secret", None);
        assert!(verifier
            .verify(&token("other", json!({"sub": "u-1", "exp": exp()})))
            .is_err());
        assert!(verifier
            .verify(&token("secret", json!({"sub": "u-1", "exp": 1_000})))
            .is_err());
    }

    #[test]
    fn checks_audience_when_configured() {
        let verifier = JwtVerifier::new("secret", Some("authenticated"));
        assert!(verifier
            .verify(&token("secret", json!({"sub": "u", "exp": exp(), "aud": "authenticated"})))
            .is_ok());
        assert!(verifier
            .verify(&token("secret", json!({"sub": "u", "exp": exp(), "aud": "anon"})))
            .is_err());
    }

    #[test]
    fn reads_bearer_header() {
        let req = actix_web::test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer abc.def"))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc.def"));

        let req = actix_web::test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Basic xyz"))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);
    }
}
