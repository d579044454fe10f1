//! Telegram client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {code} - {description}")]
    Api { code: i64, description: String },

    #[error("Empty result from Bot API")]
    EmptyResult,
}

impl From<reqwest::Error> for TelegramError {
    fn from(e: reqwest::Error) -> Self {
        // Request URLs embed the bot token.
        TelegramError::Http(e.without_url())
    }
}
