use crate::error::AppError;

pub async fn metrics_handler() -> Result<String, AppError> {
    Ok(crate::metrics::render()?)
}
