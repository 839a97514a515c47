//! Follow-up message drafting.

use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::domain::auth::AuthenticatedUser;
use crate::domain::dashboard::format_tsh;
use crate::domain::types::{FollowupMethod, FollowupType};
use crate::forms::messaging::GenerateMessageForm;
use crate::forms::{parse_date, parse_datetime};
use crate::integrations::replicate::output_text;
use crate::integrations::{AiModel, PredictionClient};
use crate::services::{ServiceError, ServiceResult, current_user_id};

const SIGN_OFF: &str = "Best regards,\nYour Team";
const SMS_CLOSING: &str = "Please call us if you have questions. Thanks!";

/// Message inputs after display formatting.
#[derive(Debug, Clone, PartialEq)]
struct MessageContext {
    customer_name: String,
    followup_type: String,
    amount: Option<String>,
    due_date: Option<String>,
    method: FollowupMethod,
}

impl TryFrom<GenerateMessageForm> for MessageContext {
    type Error = ServiceError;

    fn try_from(form: GenerateMessageForm) -> Result<Self, Self::Error> {
        validator::Validate::validate(&form)
            .map_err(|err| ServiceError::Form(err.to_string()))?;
        Ok(Self {
            customer_name: form.customer_name.trim().to_string(),
            followup_type: form.followup_type.trim().to_string(),
            amount: form.payment_amount.as_ref().and_then(display_amount),
            due_date: form.payment_due_date.as_deref().and_then(display_date),
            method: form.method,
        })
    }
}

fn display_amount(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n.as_f64().map(format_tsh),
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<f64>() {
                Ok(n) => Some(format_tsh(n)),
                Err(_) => Some(s.to_string()).filter(|s| !s.is_empty()),
            }
        }
        _ => None,
    }
}

fn display_date(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let date = parse_date(value)
        .ok()
        .or_else(|| parse_datetime(value).ok().map(|dt| dt.date()));
    Some(match date {
        Some(date) => format_date(date),
        None => value.to_string(),
    })
}

fn format_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

fn build_prompt(ctx: &MessageContext) -> String {
    let mut prompt = format!(
        "Generate a professional {} message for a customer named {}.",
        ctx.followup_type.replace('_', " "),
        ctx.customer_name
    );
    if let Some(amount) = &ctx.amount {
        prompt.push_str(&format!(" The payment amount is {amount}."));
    }
    if let Some(due) = &ctx.due_date {
        prompt.push_str(&format!(" The payment due date is {due}."));
    }
    prompt.push_str(&format!(" The message will be sent via {}.", ctx.method));
    match ctx.method {
        FollowupMethod::Sms => {
            prompt.push_str(" Keep it concise for SMS (under 160 characters).")
        }
        FollowupMethod::Email => prompt
            .push_str(" Format as a professional email with proper greeting and closing."),
        _ => {}
    }
    prompt.push_str(" Be friendly, professional, and helpful. Do not include placeholder information.");
    prompt
}

/// Canned message used whenever the model is unavailable.
fn template_message(ctx: &MessageContext) -> String {
    let name = &ctx.customer_name;
    let amount = match &ctx.amount {
        Some(a) => format!("payment of {a}"),
        None => "payment".to_string(),
    };

    let body = match FollowupType::try_from(ctx.followup_type.as_str()).ok() {
        Some(FollowupType::PaymentReminder) => {
            let due = ctx.due_date.as_deref().unwrap_or("soon");
            format!(
                "Hi {name},\n\n\
                 I hope this message finds you well. This is a friendly reminder that your {amount} is due on {due}.\n\n\
                 If you have already made this payment, please disregard this message. If you have any questions or need to discuss payment arrangements, please don't hesitate to reach out.\n\n\
                 Thank you for your business!"
            )
        }
        Some(FollowupType::OverdueNotice) => format!(
            "Hi {name},\n\n\
             We hope you're doing well. We wanted to reach out regarding your overdue {amount}.\n\n\
             We understand that sometimes circumstances can make it challenging to meet payment deadlines. We're here to work with you to find a solution that works for both of us.\n\n\
             Please contact us at your earliest convenience to discuss this matter."
        ),
        Some(FollowupType::GeneralFollowup) => format!(
            "Hi {name},\n\n\
             I wanted to follow up with you to see how everything is going and if there's anything we can help you with.\n\n\
             Your satisfaction is important to us, and we're always here to support you in any way we can.\n\n\
             Please feel free to reach out if you have any questions or concerns."
        ),
        None => format!(
            "Hi {name},\n\n\
             We wanted to reach out to you. Please let us know if you need any assistance."
        ),
    };
    let message = format!("{body}\n\n{SIGN_OFF}");

    if ctx.method == FollowupMethod::Sms {
        shorten_for_sms(&message)
    } else {
        message
    }
}

/// Keeps the first paragraph and appends a short closing line.
fn shorten_for_sms(message: &str) -> String {
    let first = message.split("\n\n").next().unwrap_or(message);
    format!("{first}\n\n{SMS_CLOSING}")
}

/// Drafts a follow-up message with the text model, falling back to a
/// template when no client is configured or the prediction fails.
pub async fn generate_message<P>(
    predictions: Option<&P>,
    user: &AuthenticatedUser,
    form: GenerateMessageForm,
) -> ServiceResult<String>
where
    P: PredictionClient + ?Sized,
{
    current_user_id(user)?;
    let ctx = MessageContext::try_from(form)?;

    if let Some(predictions) = predictions {
        let max_tokens = if ctx.method == FollowupMethod::Sms { 160 } else { 500 };
        let input = json!({
            "prompt": build_prompt(&ctx),
            "max_tokens": max_tokens,
            "temperature": 0.7,
        });
        match predictions.run(AiModel::Text, input).await {
            Ok(output) => match output_text(&output) {
                Some(text) => return Ok(text),
                None => log::warn!("Message generation returned no text; using template"),
            },
            Err(err) => log::error!("Message generation failed: {err}"),
        }
    }

    Ok(template_message(&ctx))
}
