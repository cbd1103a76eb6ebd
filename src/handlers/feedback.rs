use axum::{Json, body::Bytes};
use serde_json::{Value, json};

use super::{parse_body, rejected};
use crate::error::AppError;
use crate::metrics::REQUEST_TOTAL;
use crate::models::FeedbackSubmission;

const ROUTE: &str = "feedback";

pub async fn feedback_handler(body: Bytes) -> Result<Json<Value>, AppError> {
    REQUEST_TOTAL.with_label_values(&[ROUTE]).inc();

    let feedback: FeedbackSubmission = parse_body(ROUTE, &body)?;
    feedback.validate().map_err(|e| rejected(ROUTE, e))?;

    tracing::info!(
        page = feedback.page.as_deref().unwrap_or("-"),
        rating = ?feedback.rating,
        has_email = feedback.email.as_deref().is_some_and(|e| !e.trim().is_empty()),
        message_len = feedback.message.as_deref().map_or(0, str::len),
        "feedback received"
    );

    Ok(Json(json!({ "success": true })))
}
