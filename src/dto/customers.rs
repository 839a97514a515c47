//! Customer intake responses.

use serde::Serialize;

use crate::domain::customer::Customer;

/// Customers created by a bulk or AI-assisted intake.
#[derive(Debug, Serialize)]
pub struct CustomersResponse {
    pub customers: Vec<Customer>,
}

/// Customers created from a voice recording together with its transcript.
#[derive(Debug, Serialize)]
pub struct VoiceUploadResponse {
    pub customers: Vec<Customer>,
    pub transcription: String,
}

/// Reply when a recording was transcribed but named no customer.
#[derive(Debug, Serialize)]
pub struct VoiceNothingFound {
    pub error: &'static str,
    pub transcription: String,
}
