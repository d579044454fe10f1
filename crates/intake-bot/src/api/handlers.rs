//! HTTP request handlers.

use super::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::Serialize;
use telegram_client::{BotMessage, Update};
use tracing::{debug, warn};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub active_sessions: usize,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        active_sessions: state.sessions.count().await,
    })
}

/// Webhook endpoint.
///
/// Acknowledges with 200 as soon as the update is queued; processing runs
/// in the participant's dispatch task. Undecodable bodies are acknowledged too, since
/// Telegram would otherwise keep redelivering them.
pub async fn webhook(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Ignoring undecodable update: {}", e);
            return StatusCode::OK;
        }
    };

    match BotMessage::from_update(&update) {
        Some(message) => state.dispatcher.enqueue(message),
        None => debug!("Ignoring update {} with no usable message", update.update_id),
    }

    StatusCode::OK
}
