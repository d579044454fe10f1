//! Webhook authentication and request logging middleware.

use crate::error::AppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Header Telegram uses to echo the secret given to `setWebhook`.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Expected webhook secret, if one is configured.
#[derive(Clone, Default)]
pub struct WebhookSecret(Option<Arc<str>>);

impl WebhookSecret {
    pub fn new(secret: Option<String>) -> Self {
        Self(secret.map(Arc::from))
    }

    /// No secret: every delivery is accepted.
    pub fn disabled() -> Self {
        Self(None)
    }

    fn accepts(&self, presented: Option<&str>) -> bool {
        match (&self.0, presented) {
            (None, _) => true,
            (Some(expected), Some(presented)) => expected.as_ref() == presented,
            (Some(_), None) => false,
        }
    }
}

/// Reject webhook deliveries that do not carry the configured secret.
pub async fn verify_secret_token(
    State(secret): State<WebhookSecret>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = request
        .headers()
        .get(SECRET_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    if !secret.accepts(presented) {
        warn!("Rejected webhook delivery with bad secret token");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Logging middleware for requests.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    debug!(%method, %uri, "Request started");

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_success() {
        debug!(%method, %uri, %status, ?duration, "Request completed");
    } else {
        warn!(%method, %uri, %status, ?duration, "Request failed");
    }

    response
}
