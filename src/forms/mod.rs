//! Request payloads accepted by the JSON API.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod customers;
pub mod followups;
pub mod messaging;
pub mod payments;
pub mod profile;
pub mod uploads;

#[derive(Debug, Error)]
/// Errors that can occur when processing request payloads.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid amount")]
    InvalidAmount,

    #[error("invalid customer id")]
    InvalidCustomerId,

    #[error("invalid payment id")]
    InvalidPaymentId,

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("{0}")]
    InvalidValue(String),

    #[error("{0} is required")]
    Missing(&'static str),

    #[error("Invalid CSV: {0}")]
    Csv(String),

    #[error("CSV must have at least a header and one data row")]
    TooFewRows,

    #[error("No valid customers found in CSV")]
    NoValidCustomers,

    #[error("Failed to read upload: {0}")]
    Upload(String),
}

impl From<TypeConstraintError> for FormError {
    fn from(err: TypeConstraintError) -> Self {
        match err {
            TypeConstraintError::InvalidEmail => FormError::InvalidEmail,
            TypeConstraintError::InvalidAmount => FormError::InvalidAmount,
            TypeConstraintError::EmptyString => FormError::InvalidName,
            other => FormError::InvalidValue(other.to_string()),
        }
    }
}

impl From<csv::Error> for FormError {
    fn from(err: csv::Error) -> Self {
        FormError::Csv(err.to_string())
    }
}

/// Parses a client-supplied timestamp.
///
/// Accepts RFC 3339 (converted to UTC), naive `YYYY-MM-DDTHH:MM[:SS[.f]]`
/// and bare dates, which resolve to midnight.
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, FormError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| FormError::InvalidDate(value.to_string()))
}

/// Parses a calendar date; full timestamps are truncated to their date.
pub fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d").or_else(|_| parse_datetime(value).map(|dt| dt.date()))
}

/// Parses an optional timestamp where blank means absent.
pub fn parse_optional_datetime(value: Option<&str>) -> Result<Option<NaiveDateTime>, FormError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_datetime(v).map(Some),
        None => Ok(None),
    }
}
