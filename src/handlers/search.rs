use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use super::rejected;
use crate::error::AppError;
use crate::metrics::REQUEST_TOTAL;
use crate::search::DEFAULT_LIMIT;
use crate::state::AppState;

const ROUTE: &str = "search";

#[derive(Deserialize, Debug)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    REQUEST_TOTAL.with_label_values(&[ROUTE]).inc();

    let Query(params) =
        query.map_err(|e| rejected(ROUTE, AppError::Validation(e.body_text())))?;

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let results = state
        .search_index
        .search(&params.q, limit)
        .map_err(|e| rejected(ROUTE, e))?;

    tracing::debug!(query = %params.q, hits = results.len(), "search served");

    Ok(Json(json!({
        "query": params.q.trim(),
        "total": results.len(),
        "results": results,
    })))
}
