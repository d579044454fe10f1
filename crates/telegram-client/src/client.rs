//! Telegram Bot API HTTP client.

use crate::error::TelegramError;
use crate::types::*;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Update kinds the bot subscribes to.
const ALLOWED_UPDATES: &[&str] = &["message"];

/// Telegram Bot API client.
///
/// The bot token is part of every request path, so it is held as a
/// `SecretString` and never logged.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl TelegramClient {
    /// Create a new Telegram client.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TelegramError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: SecretString::new(token.into()),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token.expose_secret(), method)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await?;

        // The Bot API reports failures in the body, with a matching non-2xx status.
        let bytes = response.bytes().await?;
        let envelope: ApiResponse<T> = serde_json::from_slice(&bytes)?;

        if !envelope.ok {
            let code = envelope.error_code.unwrap_or_default();
            let description = envelope.description.unwrap_or_default();
            warn!("{} failed: {} - {}", method, code, description);
            return Err(TelegramError::Api { code, description });
        }

        envelope.result.ok_or(TelegramError::EmptyResult)
    }

    /// Get the bot's own account. Doubles as a token and reachability check.
    #[instrument(skip(self))]
    pub async fn get_me(&self) -> Result<BotUser, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Send a text message to a chat.
    #[instrument(skip(self, text))]
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let request = SendMessageRequest {
            chat_id,
            text: text.to_string(),
        };

        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        debug!("Sent message to {}", chat_id);
        Ok(())
    }

    /// Re-send a stored photo to a chat by file id.
    #[instrument(skip(self, caption))]
    pub async fn send_photo(
        &self,
        chat_id: i64,
        photo: &FileId,
        caption: Option<&str>,
    ) -> Result<(), TelegramError> {
        let request = SendPhotoRequest {
            chat_id,
            photo: photo.clone(),
            caption: caption.map(String::from),
        };

        let _: serde_json::Value = self.call("sendPhoto", &request).await?;
        debug!("Sent photo to {}", chat_id);
        Ok(())
    }

    /// Reply into the chat a message came from.
    pub async fn reply(&self, original: &BotMessage, text: &str) -> Result<(), TelegramError> {
        self.send_message(original.chat_id, text).await
    }

    /// Register the webhook URL Telegram should deliver updates to.
    #[instrument(skip(self, secret_token))]
    pub async fn set_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
    ) -> Result<(), TelegramError> {
        let request = SetWebhookRequest {
            url: url.to_string(),
            secret_token: secret_token.map(String::from),
            allowed_updates: allowed_updates(),
        };

        let _: bool = self.call("setWebhook", &request).await?;
        Ok(())
    }

    /// Remove any webhook so that `getUpdates` can be used.
    #[instrument(skip(self))]
    pub async fn delete_webhook(&self) -> Result<(), TelegramError> {
        let _: bool = self.call("deleteWebhook", &serde_json::json!({})).await?;
        Ok(())
    }

    /// Long-poll for pending updates.
    #[instrument(skip(self))]
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Update>, TelegramError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: allowed_updates(),
        };

        let updates: Vec<Update> = self.call("getUpdates", &request).await?;
        debug!("Received {} updates", updates.len());
        Ok(updates)
    }
}

fn allowed_updates() -> Vec<String> {
    ALLOWED_UPDATES.iter().map(|s| s.to_string()).collect()
}
