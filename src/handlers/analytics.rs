use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use serde_json::{Value, json};
use std::sync::Arc;

use super::{parse_body, rejected};
use crate::error::AppError;
use crate::metrics::{RATE_LIMIT_KEYS, RATE_LIMITED_TOTAL, REQUEST_TOTAL};
use crate::models::ChatbotEvent;
use crate::rate_limit::client_key;
use crate::state::AppState;

const ROUTE: &str = "chatbot_analytics";

pub async fn chatbot_analytics_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    REQUEST_TOTAL.with_label_values(&[ROUTE]).inc();

    let client = client_key(&headers);
    let admitted = state.rate_limiter.check(&client);
    RATE_LIMIT_KEYS.set(state.rate_limiter.tracked_keys() as i64);

    if !admitted {
        RATE_LIMITED_TOTAL.inc();
        tracing::warn!(client = %client, "rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    let event: ChatbotEvent = parse_body(ROUTE, &body)?;
    let entry = event
        .normalize(chrono::Utc::now())
        .map_err(|e| rejected(ROUTE, e))?;

    // Persistence is not wired up; the structured log line is the record.
    let metadata = serde_json::Value::Object(entry.metadata.clone());
    tracing::info!(
        client = %client,
        message_id = %entry.message_id,
        session_id = %entry.session_id,
        timestamp = %entry.timestamp,
        response_timing_ms = entry.response_timing,
        is_helpful = ?entry.is_helpful,
        user_message_len = entry.user_message.len(),
        bot_response_len = entry.bot_response.len(),
        metadata = %metadata,
        "chatbot interaction logged"
    );

    Ok(Json(json!({ "success": true })))
}
