pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod search;
pub mod state;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::error::INTERNAL_ERROR_MESSAGE;
use crate::handlers::{
    chatbot_analytics_handler, contact_handler, feedback_handler, health_handler, metrics_handler,
    search_handler,
};
use crate::metrics::track_latency;
use crate::state::AppState;

/// Builds the full router: API routes plus health and metrics.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/analytics/chatbot", post(chatbot_analytics_handler))
        .route("/api/search", get(search_handler))
        .route("/api/feedback", post(feedback_handler))
        .route("/api/contact", post(contact_handler))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(track_latency))
        .layer(TraceLayer::new_for_http())
}

// A panicking handler still answers with the generic 500 body.
pub(crate) fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
    )
        .into_response()
}
