use axum::{Json, body::Bytes};
use serde_json::{Value, json};

use super::{parse_body, rejected};
use crate::error::AppError;
use crate::metrics::REQUEST_TOTAL;
use crate::models::ContactSubmission;

const ROUTE: &str = "contact";

// Lead capture. Nothing is stored or mailed yet, the lead only goes to the log.
pub async fn contact_handler(body: Bytes) -> Result<Json<Value>, AppError> {
    REQUEST_TOTAL.with_label_values(&[ROUTE]).inc();

    let contact: ContactSubmission = parse_body(ROUTE, &body)?;
    contact.validate().map_err(|e| rejected(ROUTE, e))?;

    tracing::info!(
        name = contact.name.as_deref().unwrap_or_default(),
        email = contact.email.as_deref().unwrap_or_default(),
        company = contact.company.as_deref().unwrap_or("-"),
        phone = contact.phone.as_deref().unwrap_or("-"),
        inquiry_type = contact.inquiry_type.as_deref().unwrap_or("general"),
        "contact request received"
    );

    Ok(Json(json!({
        "success": true,
        "message": "Thank you for contacting us. We will get back to you shortly."
    })))
}
