//! Telegram Bot API types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Envelope wrapping every Bot API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub error_code: Option<i64>,
    pub description: Option<String>,
}

/// Incoming update, as delivered by webhook or `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub date: i64,
    pub text: Option<String>,
    pub photo: Option<Vec<PhotoSize>>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub chat_type: String,
}

/// One resolution of a photo. Telegram offers several per message.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub file_unique_id: String,
    pub width: u32,
    pub height: u32,
    pub file_size: Option<u64>,
}

impl PhotoSize {
    fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Opaque reference to a file stored on Telegram's servers.
///
/// The bytes are never fetched by the bot; Telegram resolves the id
/// when the file is re-sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bot account information returned by `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

/// `sendMessage` request body.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub text: String,
}

/// `sendPhoto` request body.
#[derive(Debug, Clone, Serialize)]
pub struct SendPhotoRequest {
    pub chat_id: i64,
    pub photo: FileId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// `setWebhook` request body.
#[derive(Debug, Clone, Serialize)]
pub struct SetWebhookRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_token: Option<String>,
    pub allowed_updates: Vec<String>,
}

/// `getUpdates` request body.
#[derive(Debug, Clone, Serialize)]
pub struct GetUpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: Vec<String>,
}

/// Payload of a normalized message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Photo(FileId),
}

/// Parsed message for bot processing.
#[derive(Debug, Clone)]
pub struct BotMessage {
    /// Telegram user id of the sender.
    pub participant: i64,
    /// Chat to reply into.
    pub chat_id: i64,
    /// Sender's first name, used in logs.
    pub sender_name: String,
    pub content: Content,
    /// Unix timestamp of the message.
    pub timestamp: i64,
}

impl BotMessage {
    /// Normalize an update into a bot message.
    ///
    /// Only new messages with a sender and either a photo or text are kept.
    /// For photos, the largest offered resolution is selected.
    pub fn from_update(update: &Update) -> Option<Self> {
        let message = update.message.as_ref()?;
        let from = message.from.as_ref()?;

        let content = if let Some(photo) = message.photo.as_ref() {
            Content::Photo(largest_photo(photo)?)
        } else {
            Content::Text(message.text.clone()?)
        };

        Some(Self {
            participant: from.id,
            chat_id: message.chat.id,
            sender_name: from.first_name.clone(),
            content,
            timestamp: message.date,
        })
    }

    /// Text of the message, if it is a text message.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Photo(_) => None,
        }
    }

    /// Bot command name, lowercased and without any `@botname` suffix.
    ///
    /// `/Start@IntakeBot payload` yields `start`.
    pub fn command(&self) -> Option<String> {
        let word = self.text()?.strip_prefix('/')?.split_whitespace().next()?;
        let name = word.split('@').next().unwrap_or(word);
        if name.is_empty() {
            return None;
        }
        Some(name.to_lowercase())
    }
}

/// Pick the highest-resolution variant. Later entries win ties.
fn largest_photo(sizes: &[PhotoSize]) -> Option<FileId> {
    sizes
        .iter()
        .enumerate()
        .max_by_key(|(index, p)| (p.area(), p.file_size.unwrap_or(0), *index))
        .map(|(_, p)| FileId::new(p.file_id.clone()))
}
