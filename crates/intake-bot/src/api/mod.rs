//! HTTP front door for Telegram webhook deliveries.

mod handlers;
mod middleware;

pub use handlers::*;
pub use middleware::{logging_middleware, verify_secret_token, WebhookSecret};

use crate::config::WEBHOOK_PATH;
use crate::dispatcher::Dispatcher;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use session_store::SessionStore;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Routes messages to handlers
    pub dispatcher: Arc<Dispatcher>,
    /// Session store, for health reporting
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(dispatcher: Arc<Dispatcher>, sessions: SessionStore) -> Self {
        Self {
            dispatcher,
            sessions,
        }
    }
}

/// Create the API router.
///
/// When `secret` is set, webhook requests must carry it in the
/// `X-Telegram-Bot-Api-Secret-Token` header.
pub fn create_router(state: AppState, secret: WebhookSecret) -> Router {
    let webhook = Router::new()
        .route(WEBHOOK_PATH, post(handlers::webhook))
        .layer(axum_middleware::from_fn_with_state(secret, verify_secret_token));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(webhook)
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
