//! Help command - displays available commands.

use crate::commands::CommandHandler;
use crate::error::AppResult;
use async_trait::async_trait;
use telegram_client::BotMessage;

pub struct HelpHandler;

impl HelpHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HelpHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    fn command(&self) -> Option<&str> {
        Some("help")
    }

    async fn execute(&self, _message: &BotMessage) -> AppResult<String> {
        Ok("Training Registration Bot\n\n\
            Commands:\n\
            /start - Begin (or restart) your registration\n\
            /myid - Show your Telegram ID\n\
            /help - Show this message\n\n\
            After /start, send your full name, then your phone number, \
            then a photo of your payment receipt."
            .into())
    }
}
