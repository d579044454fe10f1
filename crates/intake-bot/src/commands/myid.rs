//! MyId command - reports the caller's own participant id.

use crate::commands::CommandHandler;
use crate::error::AppResult;
use async_trait::async_trait;
use telegram_client::BotMessage;

pub struct MyIdHandler;

impl MyIdHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MyIdHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for MyIdHandler {
    fn command(&self) -> Option<&str> {
        Some("myid")
    }

    async fn execute(&self, message: &BotMessage) -> AppResult<String> {
        Ok(format!("Your ID: {}", message.participant))
    }
}
