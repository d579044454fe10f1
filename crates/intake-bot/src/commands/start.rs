//! Start command - begins or restarts a registration.

use crate::commands::CommandHandler;
use crate::error::AppResult;
use crate::flow::Event;
use crate::registrar::Registrar;
use async_trait::async_trait;
use session_store::ParticipantId;
use std::sync::Arc;
use telegram_client::BotMessage;
use tracing::info;

pub struct StartHandler {
    registrar: Arc<Registrar>,
}

impl StartHandler {
    pub fn new(registrar: Arc<Registrar>) -> Self {
        Self { registrar }
    }
}

#[async_trait]
impl CommandHandler for StartHandler {
    fn command(&self) -> Option<&str> {
        Some("start")
    }

    async fn execute(&self, message: &BotMessage) -> AppResult<String> {
        let participant = ParticipantId(message.participant);
        info!("Registration started by {}", participant);

        let prompt = self.registrar.handle(participant, Event::Start).await;
        Ok(prompt.text().into())
    }
}
