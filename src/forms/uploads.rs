//! Multipart upload forms for bulk customer intake.

use std::io::Read;

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use base64::prelude::*;

use crate::domain::customer::NewCustomer;
use crate::domain::types::UserId;
use crate::forms::FormError;
use crate::forms::customers::parse_customers_csv;

/// Uploaded file contents plus the media type the client declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Encodes the file as a `data:` URL.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            BASE64_STANDARD.encode(&self.bytes)
        )
    }
}

fn read_temp_file(file: &mut TempFile, fallback_type: &str) -> Result<UploadedFile, FormError> {
    let mut bytes = Vec::new();
    file.file
        .as_file_mut()
        .read_to_end(&mut bytes)
        .map_err(|e| FormError::Upload(e.to_string()))?;

    let content_type = file
        .content_type
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| fallback_type.to_string());

    Ok(UploadedFile {
        content_type,
        bytes,
    })
}

#[derive(MultipartForm)]
pub struct UploadCustomersCsvForm {
    #[multipart(limit = "10MB")]
    pub file: TempFile,
}

impl UploadCustomersCsvForm {
    pub fn parse(&mut self, user_id: &UserId) -> Result<Vec<NewCustomer>, FormError> {
        let upload = read_temp_file(&mut self.file, "text/csv")?;
        let text = String::from_utf8(upload.bytes)
            .map_err(|_| FormError::Csv("file is not valid UTF-8".to_string()))?;
        parse_customers_csv(&text, user_id)
    }
}

#[derive(MultipartForm)]
pub struct UploadImageForm {
    #[multipart(limit = "20MB")]
    pub image: TempFile,
}

impl UploadImageForm {
    pub fn read(&mut self) -> Result<UploadedFile, FormError> {
        read_temp_file(&mut self.image, "image/jpeg")
    }
}

#[derive(MultipartForm)]
pub struct UploadAudioForm {
    #[multipart(limit = "25MB")]
    pub audio: TempFile,
}

impl UploadAudioForm {
    pub fn read(&mut self) -> Result<UploadedFile, FormError> {
        read_temp_file(&mut self.audio, "audio/webm")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_embeds_type_and_payload() {
        let file = UploadedFile {
            content_type: "image/png".into(),
            bytes: b"abc".to_vec(),
        };
        assert_eq!(file.to_data_url(), "data:image/png;base64,YWJj");
    }
}
