use axum::{http::StatusCode, Json};

pub mod content;
pub mod favorites;
pub mod health;
pub mod lists;
pub mod playlist;

/// Error half of every handler result: status plus `{"error": "..."}`
pub type ApiError = (StatusCode, Json<serde_json::Value>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(serde_json::json!({ "error": message.into() })),
    )
}

/// Log a store failure and hide its details from the caller
pub fn internal_error(err: anyhow::Error) -> ApiError {
    tracing::error!("Database error: {:#}", err);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
}

/// Trimmed value of a mandatory text field
pub fn required_text(value: &str, field: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("{} é obrigatório", field),
        ));
    }
    Ok(trimmed.to_string())
}
