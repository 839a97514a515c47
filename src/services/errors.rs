use serde_json::Value;
use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::integrations::IntegrationError;
use crate::repository::errors::RepositoryError;

/// Errors surfaced by the service layer; routes map them onto HTTP statuses.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Form(String),

    #[error("{0}")]
    TypeConstraint(String),

    #[error("{0}")]
    NotConfigured(String),

    #[error("Database error: {0}")]
    Repository(RepositoryError),

    #[error("{0}")]
    Integration(#[from] IntegrationError),

    /// Upstream failure reported with its own status and payload.
    #[error("{message}")]
    Upstream {
        status: u16,
        message: String,
        details: Value,
    },

    #[error("Internal server error")]
    Internal,
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound("Not found".to_string()),
            other => ServiceError::Repository(other),
        }
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(err.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_not_found_becomes_not_found() {
        let err = ServiceError::from(RepositoryError::NotFound);
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn other_repository_errors_are_wrapped() {
        let err = ServiceError::from(RepositoryError::ConnectionError("pool".into()));
        assert!(matches!(err, ServiceError::Repository(_)));
    }
}
