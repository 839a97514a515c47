//! AI-assisted customer intake from images and voice recordings.

use serde_json::{Value, json};

use crate::domain::auth::AuthenticatedUser;
use crate::domain::customer::{Customer, NewCustomer};
use crate::domain::types::{CustomerName, CustomerSource, TypeConstraintError, UserId};
use crate::forms::uploads::UploadedFile;
use crate::integrations::replicate::output_text;
use crate::integrations::{AiModel, IntegrationError, PredictionClient};
use crate::repository::CustomerWriter;
use crate::services::customers::store_customers;
use crate::services::{ServiceError, ServiceResult, current_user_id};

const EXTRACTION_FORMAT: &str = r#"Look for names, email addresses, phone numbers, addresses, and any notes. Format the response as JSON with this structure:
{
  "customers": [
    {
      "name": "Customer Name",
      "email": "email@example.com",
      "phone": "phone number",
      "address": "full address",
      "notes": "any additional notes"
    }
  ]
}
If no customer information is found, return {"customers": []}."#;

const NOT_CONFIGURED: &str = "Replicate API token not configured";

/// Customer details as returned by the extraction prompt.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExtractedCustomer {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl ExtractedCustomer {
    fn from_value(value: &Value) -> Self {
        let field = |key: &str| match value.get(key) {
            Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Self {
            name: field("name"),
            email: field("email"),
            phone: field("phone"),
            address: field("address"),
            notes: field("notes"),
        }
    }

    fn placeholder(name: &str, notes: String) -> Self {
        Self {
            name: Some(name.to_string()),
            notes: Some(notes),
            ..Self::default()
        }
    }

    /// Builds the insert, filling a missing name with `Unknown` and missing
    /// notes with `default_notes`.
    fn into_new_customer(
        self,
        user_id: &UserId,
        source: CustomerSource,
        default_notes: &str,
    ) -> Result<NewCustomer, TypeConstraintError> {
        let name = match self.name.and_then(|n| CustomerName::new(n).ok()) {
            Some(name) => name,
            None => CustomerName::new("Unknown")?,
        };
        Ok(NewCustomer::new(user_id.clone(), name, source)
            .with_email(self.email)
            .with_phone(self.phone)
            .with_address(self.address)
            .with_notes(Some(self.notes.unwrap_or_else(|| default_notes.to_string()))))
    }
}

/// Parses `{"customers": [...]}` from model output.
///
/// Models often wrap the JSON in prose or code fences, so the outermost
/// `{...}` span is tried when the whole text is not valid JSON. Returns
/// `None` when no such object can be read.
pub fn parse_extraction(text: &str) -> Option<Vec<ExtractedCustomer>> {
    let parsed = serde_json::from_str::<Value>(text.trim()).ok().or_else(|| {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        (start < end)
            .then(|| serde_json::from_str::<Value>(&text[start..=end]).ok())
            .flatten()
    })?;

    let customers = parsed.get("customers")?.as_array()?;
    Some(customers.iter().map(ExtractedCustomer::from_value).collect())
}

fn require_client<P>(predictions: Option<&P>) -> ServiceResult<&P>
where
    P: PredictionClient + ?Sized,
{
    predictions.ok_or_else(|| {
        log::error!("AI intake requested without a configured token");
        ServiceError::NotConfigured(NOT_CONFIGURED.to_string())
    })
}

async fn run_text<P>(predictions: &P, model: AiModel, input: Value) -> Result<String, IntegrationError>
where
    P: PredictionClient + ?Sized,
{
    let output = predictions.run(model, input).await?;
    output_text(&output).ok_or_else(|| IntegrationError::Parse("empty model output".to_string()))
}

/// Extracts customers from a photographed document or card.
///
/// When the model call itself fails a single placeholder customer is stored
/// so the upload is not lost.
pub async fn import_customers_from_image<R, P>(
    repo: &R,
    predictions: Option<&P>,
    user: &AuthenticatedUser,
    image: UploadedFile,
) -> ServiceResult<Vec<Customer>>
where
    R: CustomerWriter + ?Sized,
    P: PredictionClient + ?Sized,
{
    let user_id = current_user_id(user)?;
    let predictions = require_client(predictions)?;

    let input = json!({
        "prompt": format!("Extract customer information from this image. {EXTRACTION_FORMAT}"),
        "image": image.to_data_url(),
        "max_tokens": 1000,
    });

    let new_customers = match run_text(predictions, AiModel::Vision, input).await {
        Ok(text) => {
            let extracted = parse_extraction(&text).unwrap_or_else(|| {
                log::warn!("Image extraction output was not JSON; storing raw text");
                vec![ExtractedCustomer::placeholder("Extracted Customer", text.clone())]
            });
            if extracted.is_empty() {
                return Err(ServiceError::Form(
                    "No customer information found in image".to_string(),
                ));
            }
            extracted
                .into_iter()
                .map(|c| {
                    c.into_new_customer(&user_id, CustomerSource::Ocr, "Extracted from uploaded image")
                })
                .collect::<Result<Vec<_>, _>>()?
        }
        Err(err) => {
            log::error!("Image extraction failed: {err}");
            vec![
                ExtractedCustomer::placeholder(
                    "OCR Customer (AI Unavailable)",
                    "OCR processing temporarily unavailable".to_string(),
                )
                .into_new_customer(&user_id, CustomerSource::Ocr, "")?,
            ]
        }
    };

    store_customers(repo, &new_customers)
}

/// Result of a voice upload.
#[derive(Debug)]
pub enum VoiceIntake {
    Created {
        customers: Vec<Customer>,
        transcription: String,
    },
    /// The recording was transcribed but named nobody.
    NothingFound { transcription: String },
}

fn voice_failure(err: IntegrationError) -> ServiceError {
    log::error!("Voice processing failed: {err}");
    ServiceError::Upstream {
        status: 500,
        message: "Voice processing failed. Please check your Replicate API configuration."
            .to_string(),
        details: Value::String(err.to_string()),
    }
}

/// Transcribes a recording, then extracts customers from the transcript.
pub async fn import_customers_from_voice<R, P>(
    repo: &R,
    predictions: Option<&P>,
    user: &AuthenticatedUser,
    audio: UploadedFile,
) -> ServiceResult<VoiceIntake>
where
    R: CustomerWriter + ?Sized,
    P: PredictionClient + ?Sized,
{
    let user_id = current_user_id(user)?;
    let predictions = require_client(predictions)?;

    let transcription_input = json!({
        "audio": audio.to_data_url(),
        "model": "large-v3",
        "translate": false,
        "temperature": 0,
        "suppress_tokens": "-1",
        "logprob_threshold": -1,
        "no_speech_threshold": 0.6,
        "condition_on_previous_text": true,
        "compression_ratio_threshold": 2.4,
        "temperature_increment_on_fallback": 0.2,
    });
    let transcription = run_text(predictions, AiModel::Transcription, transcription_input)
        .await
        .map_err(voice_failure)?;

    let extraction_input = json!({
        "prompt": format!(
            "Extract customer information from this transcribed voice recording: \"{transcription}\"\n\n{EXTRACTION_FORMAT}"
        ),
    });
    let text = run_text(predictions, AiModel::Text, extraction_input)
        .await
        .map_err(voice_failure)?;

    let extracted = parse_extraction(&text).unwrap_or_else(|| {
        log::warn!("Voice extraction output was not JSON; storing transcription");
        vec![ExtractedCustomer::placeholder(
            "Voice Customer",
            format!("Transcription: {transcription}"),
        )]
    });

    if extracted.is_empty() {
        return Ok(VoiceIntake::NothingFound { transcription });
    }

    let default_notes = format!("Voice transcription: {transcription}");
    let new_customers = extracted
        .into_iter()
        .map(|c| c.into_new_customer(&user_id, CustomerSource::Voice, &default_notes))
        .collect::<Result<Vec<_>, _>>()?;

    let customers = store_customers(repo, &new_customers)?;
    Ok(VoiceIntake::Created {
        customers,
        transcription,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let text = r#"{"customers":[{"name":"Amina Juma","phone":255712345678,"email":""}]}"#;
        let customers = parse_extraction(text).unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].name.as_deref(), Some("Amina Juma"));
        assert_eq!(customers[0].phone.as_deref(), Some("255712345678"));
        assert_eq!(customers[0].email, None);
    }

    #[test]
    fn parses_json_wrapped_in_prose() {
        let text = "Here you go:\n```json\n{\"customers\": [{\"name\": \"Baraka\"}]}\n```";
        let customers = parse_extraction(text).unwrap();
        assert_eq!(customers[0].name.as_deref(), Some("Baraka"));
    }

    #[test]
    fn empty_list_is_not_a_parse_failure() {
        assert_eq!(parse_extraction(r#"{"customers": []}"#), Some(Vec::new()));
    }

    #[test]
    fn prose_without_json_fails() {
        assert_eq!(parse_extraction("I could not read the card."), None);
        assert_eq!(parse_extraction(r#"{"people": []}"#), None);
    }

    #[test]
    fn missing_fields_get_defaults() {
        let user_id = UserId::new("u").unwrap();
        let customer = ExtractedCustomer::default().into_new_customer(
            &user_id,
            CustomerSource::Ocr,
            "Extracted from uploaded image",
        )
        .unwrap();
        assert_eq!(customer.name.as_str(), "Unknown");
        assert_eq!(
            customer.notes.as_ref().map(|n| n.as_str()),
            Some("Extracted from uploaded image")
        );
        assert_eq!(customer.source, CustomerSource::Ocr);
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod service_tests {
    use super::*;
    use crate::integrations::mock::MockPredictions;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{customer, user};

    fn upload(content_type: &str) -> UploadedFile {
        UploadedFile {
            content_type: content_type.to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    #[actix_web::test]
    async fn image_requires_configured_client() {
        let repo = MockRepository::new();
        let result = import_customers_from_image::<_, MockPredictions>(
            &repo,
            None,
            &user(),
            upload("image/png"),
        )
        .await;
        assert!(matches!(result, Err(ServiceError::NotConfigured(_))));
    }

    #[actix_web::test]
    async fn image_stores_extracted_customers() {
        let mut predictions = MockPredictions::new();
        predictions
            .expect_run()
            .withf(|model, input| {
                *model == AiModel::Vision
                    && input["image"]
                        .as_str()
                        .is_some_and(|url| url.starts_with("data:image/png;base64,"))
            })
            .returning(|_, _| {
                Ok(json!(r#"{"customers":[{"name":"Asha"},{"name":"Baraka","notes":"VIP"}]}"#))
            });

        let mut repo = MockRepository::new();
        repo.expect_create_customers()
            .withf(|customers| {
                customers.len() == 2
                    && customers.iter().all(|c| c.source == CustomerSource::Ocr)
                    && customers[0].notes.as_ref().map(|n| n.as_str())
                        == Some("Extracted from uploaded image")
                    && customers[1].notes.as_ref().map(|n| n.as_str()) == Some("VIP")
            })
            .returning(|_| Ok(vec![customer(1, "Asha"), customer(2, "Baraka")]));

        let stored =
            import_customers_from_image(&repo, Some(&predictions), &user(), upload("image/png"))
                .await
                .unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[actix_web::test]
    async fn image_with_no_customers_is_rejected() {
        let mut predictions = MockPredictions::new();
        predictions
            .expect_run()
            .returning(|_, _| Ok(json!("{\"customers\": []}")));
        let mut repo = MockRepository::new();
        repo.expect_create_customers().never();

        let result =
            import_customers_from_image(&repo, Some(&predictions), &user(), upload("image/png"))
                .await;
        assert!(
            matches!(result, Err(ServiceError::Form(msg)) if msg == "No customer information found in image")
        );
    }

    #[actix_web::test]
    async fn image_failure_stores_placeholder() {
        let mut predictions = MockPredictions::new();
        predictions
            .expect_run()
            .returning(|_, _| Err(IntegrationError::TimedOut));
        let mut repo = MockRepository::new();
        repo.expect_create_customers()
            .withf(|customers| {
                customers.len() == 1 && customers[0].name.as_str() == "OCR Customer (AI Unavailable)"
            })
            .returning(|_| Ok(vec![customer(5, "Placeholder")]));

        let stored =
            import_customers_from_image(&repo, Some(&predictions), &user(), upload("image/png"))
                .await
                .unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[actix_web::test]
    async fn voice_falls_back_to_transcription_customer() {
        let mut predictions = MockPredictions::new();
        predictions
            .expect_run()
            .withf(|model, _| *model == AiModel::Transcription)
            .returning(|_, _| Ok(json!({"transcription": "Mteja mpya ni Neema"})));
        predictions
            .expect_run()
            .withf(|model, input| {
                *model == AiModel::Text
                    && input["prompt"]
                        .as_str()
                        .is_some_and(|p| p.contains("Mteja mpya ni Neema"))
            })
            .returning(|_, _| Ok(json!(["Sorry, ", "no JSON"])));

        let mut repo = MockRepository::new();
        repo.expect_create_customers()
            .withf(|customers| {
                customers.len() == 1
                    && customers[0].name.as_str() == "Voice Customer"
                    && customers[0].notes.as_ref().map(|n| n.as_str())
                        == Some("Transcription: Mteja mpya ni Neema")
            })
            .returning(|_| Ok(vec![customer(3, "Voice")]));

        let outcome =
            import_customers_from_voice(&repo, Some(&predictions), &user(), upload("audio/webm"))
                .await
                .unwrap();
        match outcome {
            VoiceIntake::Created {
                customers,
                transcription,
            } => {
                assert_eq!(customers.len(), 1);
                assert_eq!(transcription, "Mteja mpya ni Neema");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[actix_web::test]
    async fn voice_with_nobody_named_echoes_transcription() {
        let mut predictions = MockPredictions::new();
        predictions
            .expect_run()
            .withf(|model, _| *model == AiModel::Transcription)
            .returning(|_, _| Ok(json!("hello there")));
        predictions
            .expect_run()
            .withf(|model, _| *model == AiModel::Text)
            .returning(|_, _| Ok(json!("{\"customers\": []}")));
        let repo = MockRepository::new();

        let outcome =
            import_customers_from_voice(&repo, Some(&predictions), &user(), upload("audio/webm"))
                .await
                .unwrap();
        assert!(
            matches!(outcome, VoiceIntake::NothingFound { transcription } if transcription == "hello there")
        );
    }

    #[actix_web::test]
    async fn voice_ai_failure_reports_details() {
        let mut predictions = MockPredictions::new();
        predictions
            .expect_run()
            .returning(|_, _| Err(IntegrationError::PredictionFailed("bad audio".into())));
        let repo = MockRepository::new();

        let result =
            import_customers_from_voice(&repo, Some(&predictions), &user(), upload("audio/webm"))
                .await;
        match result {
            Err(ServiceError::Upstream {
                status, details, ..
            }) => {
                assert_eq!(status, 500);
                assert_eq!(details, Value::String("bad audio".into()));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
