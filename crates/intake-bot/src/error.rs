//! Application error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Telegram error: {0}")]
    Telegram(#[from] telegram_client::TelegramError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Webhook secret token mismatch")]
    Unauthorized,
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Telegram(_) => (StatusCode::BAD_GATEWAY, "TELEGRAM_ERROR"),
            AppError::Config(_) | AppError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
