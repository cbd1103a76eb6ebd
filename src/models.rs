use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

pub const MAX_MESSAGE_LEN: usize = 5_000;

// Chatbot analytics request format
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotEvent {
    pub message_id: Option<String>,
    pub session_id: Option<String>,
    pub user_message: Option<String>,
    pub bot_response: Option<String>,
    pub timestamp: Option<String>,
    pub response_timing: Option<f64>,
    pub is_helpful: Option<bool>,
    pub metadata: Option<Map<String, Value>>,
}

// What gets logged once an event is accepted
#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotLogEntry {
    pub message_id: String,
    pub session_id: String,
    pub user_message: String,
    pub bot_response: String,
    pub timestamp: String,
    pub response_timing: f64, // milliseconds, never negative
    pub is_helpful: Option<bool>,
    pub metadata: Map<String, Value>,
}

impl ChatbotEvent {
    /// Checks the required fields and fills every optional one with its
    /// default. `now` stamps events that arrive without a timestamp.
    pub fn normalize(self, now: DateTime<Utc>) -> Result<ChatbotLogEntry, AppError> {
        let mut missing = Vec::new();
        let message_id = required(self.message_id, "messageId", &mut missing);
        let session_id = required(self.session_id, "sessionId", &mut missing);
        let user_message = required(self.user_message, "userMessage", &mut missing);

        match (message_id, session_id, user_message) {
            (Some(message_id), Some(session_id), Some(user_message)) => Ok(ChatbotLogEntry {
                message_id,
                session_id,
                user_message,
                bot_response: self.bot_response.unwrap_or_default(),
                timestamp: self
                    .timestamp
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true)),
                response_timing: self
                    .response_timing
                    .filter(|ms| ms.is_finite() && *ms >= 0.0)
                    .unwrap_or(0.0),
                is_helpful: self.is_helpful,
                metadata: self.metadata.unwrap_or_default(),
            }),
            _ => Err(missing_fields(&missing)),
        }
    }
}

// Page feedback widget
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    pub message: Option<String>,
    pub rating: Option<u8>,
    pub page: Option<String>,
    pub email: Option<String>,
}

impl FeedbackSubmission {
    pub fn validate(&self) -> Result<(), AppError> {
        let message = self.message.as_deref().map(str::trim).unwrap_or_default();
        if message.is_empty() {
            return Err(missing_fields(&["message"]));
        }
        check_length("message", message)?;

        if let Some(rating) = self.rating {
            if !(1..=5).contains(&rating) {
                return Err(AppError::Validation(
                    "rating must be between 1 and 5".to_string(),
                ));
            }
        }

        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            check_email(email)?;
        }

        Ok(())
    }
}

// Contact / lead capture form
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub inquiry_type: Option<String>,
}

impl ContactSubmission {
    pub fn validate(&self) -> Result<(), AppError> {
        let fields = [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ];
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, v)| v.as_deref().map(str::trim).unwrap_or_default().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(missing_fields(&missing));
        }

        check_email(self.email.as_deref().unwrap_or_default())?;
        check_length("message", self.message.as_deref().unwrap_or_default())
    }
}

fn required(
    value: Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    match value {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            missing.push(name);
            None
        }
    }
}

fn missing_fields(names: &[&str]) -> AppError {
    AppError::Validation(format!("Missing required fields: {}", names.join(", ")))
}

fn check_length(field: &str, value: &str) -> Result<(), AppError> {
    if value.chars().count() > MAX_MESSAGE_LEN {
        return Err(AppError::Validation(format!(
            "{field} must be at most {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(())
}

// local@domain.tld - one '@', something on both sides, a dot inside the domain
pub fn check_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(AppError::Validation("Invalid email address".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn event(body: Value) -> ChatbotEvent {
        serde_json::from_value(body).unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn normalize_fills_defaults() {
        let entry = event(json!({
            "messageId": "m1",
            "sessionId": "s1",
            "userMessage": "what is S/4HANA?"
        }))
        .normalize(fixed_now())
        .unwrap();

        assert_eq!(entry.bot_response, "");
        assert_eq!(entry.timestamp, "2026-03-01T12:00:00.000Z");
        assert_eq!(entry.response_timing, 0.0);
        assert_eq!(entry.is_helpful, None);
        assert!(entry.metadata.is_empty());
    }

    #[test]
    fn normalize_keeps_supplied_optionals() {
        let entry = event(json!({
            "messageId": "m1",
            "sessionId": "s1",
            "userMessage": "hi",
            "botResponse": "hello",
            "timestamp": "2026-01-01T00:00:00Z",
            "responseTiming": 420,
            "isHelpful": true,
            "metadata": { "page": "/careers" }
        }))
        .normalize(fixed_now())
        .unwrap();

        assert_eq!(entry.bot_response, "hello");
        assert_eq!(entry.timestamp, "2026-01-01T00:00:00Z");
        assert_eq!(entry.response_timing, 420.0);
        assert_eq!(entry.is_helpful, Some(true));
        assert_eq!(entry.metadata.get("page"), Some(&json!("/careers")));
    }

    #[test]
    fn fractional_response_timing_is_kept() {
        let entry = event(json!({
            "messageId": "m1",
            "sessionId": "s1",
            "userMessage": "hi",
            "responseTiming": 1234.5
        }))
        .normalize(fixed_now())
        .unwrap();
        assert_eq!(entry.response_timing, 1234.5);
    }

    #[test]
    fn negative_response_timing_falls_back_to_zero() {
        let entry = event(json!({
            "messageId": "m1",
            "sessionId": "s1",
            "userMessage": "hi",
            "responseTiming": -12.0
        }))
        .normalize(fixed_now())
        .unwrap();
        assert_eq!(entry.response_timing, 0.0);
    }

    #[test]
    fn normalize_lists_missing_fields() {
        let err = event(json!({ "sessionId": "s1", "userMessage": "" }))
            .normalize(fixed_now())
            .unwrap_err();

        match err {
            AppError::Validation(msg) => {
                assert_eq!(msg, "Missing required fields: messageId, userMessage")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn normalized_entry_serializes_camel_case() {
        let entry = event(json!({ "messageId": "m", "sessionId": "s", "userMessage": "u" }))
            .normalize(fixed_now())
            .unwrap();
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["messageId"], "m");
        assert_eq!(value["isHelpful"], Value::Null);
        assert_eq!(value["metadata"], json!({}));
    }

    #[test]
    fn feedback_requires_message() {
        assert!(FeedbackSubmission::default().validate().is_err());
        let blank = FeedbackSubmission {
            message: Some("   ".into()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn feedback_rating_range() {
        let mut fb = FeedbackSubmission {
            message: Some("Useful page".into()),
            rating: Some(5),
            ..Default::default()
        };
        assert!(fb.validate().is_ok());
        fb.rating = Some(0);
        assert!(fb.validate().is_err());
        fb.rating = Some(6);
        assert!(fb.validate().is_err());
    }

    #[test]
    fn feedback_email_is_optional_but_checked() {
        let mut fb = FeedbackSubmission {
            message: Some("ok".into()),
            email: Some("".into()),
            ..Default::default()
        };
        assert!(fb.validate().is_ok());
        fb.email = Some("nope".into());
        assert!(fb.validate().is_err());
    }

    #[test]
    fn feedback_rejects_oversized_message() {
        let fb = FeedbackSubmission {
            message: Some("x".repeat(MAX_MESSAGE_LEN + 1)),
            ..Default::default()
        };
        assert!(fb.validate().is_err());
    }

    #[test]
    fn contact_reports_all_missing_fields() {
        let err = ContactSubmission {
            email: Some("a@b.co".into()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: name, message");
    }

    #[test]
    fn contact_accepts_complete_submission() {
        let contact = ContactSubmission {
            name: Some("Dana".into()),
            email: Some("dana@example.com".into()),
            message: Some("We need help with an SAP migration.".into()),
            company: Some("Acme".into()),
            ..Default::default()
        };
        assert!(contact.validate().is_ok());
    }

    #[test]
    fn email_shapes() {
        for good in ["a@b.co", "first.last@sub.example.org", " x@y.io "] {
            assert!(check_email(good).is_ok(), "{good}");
        }
        for bad in ["", "plain", "@b.co", "a@", "a@b", "a@@b.co", "a@b.", "a b@c.io", "a@.io"] {
            assert!(check_email(bad).is_err(), "{bad}");
        }
    }
}
