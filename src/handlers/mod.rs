mod analytics;
mod contact;
mod feedback;
mod health;
mod metrics;
mod search;

pub use analytics::chatbot_analytics_handler;
pub use contact::contact_handler;
pub use feedback::feedback_handler;
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use search::search_handler;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::metrics::VALIDATION_FAILURES;

// Parses a JSON body; anything unreadable counts as a malformed request.
fn parse_body<T: DeserializeOwned>(route: &str, body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        VALIDATION_FAILURES.with_label_values(&[route]).inc();
        AppError::Validation(format!("Invalid JSON body: {e}"))
    })
}

// Counts a validation failure before handing the error back.
fn rejected(route: &str, err: AppError) -> AppError {
    if matches!(err, AppError::Validation(_)) {
        VALIDATION_FAILURES.with_label_values(&[route]).inc();
    }
    err
}
