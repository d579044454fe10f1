//! Default handler - feeds names, phone numbers and receipts into the flow.

use crate::commands::CommandHandler;
use crate::error::AppResult;
use crate::flow::Event;
use crate::registrar::Registrar;
use async_trait::async_trait;
use session_store::ParticipantId;
use std::sync::Arc;
use telegram_client::{BotMessage, Content};
use tracing::{debug, instrument};

pub struct RegisterHandler {
    registrar: Arc<Registrar>,
}

impl RegisterHandler {
    pub fn new(registrar: Arc<Registrar>) -> Self {
        Self { registrar }
    }
}

#[async_trait]
impl CommandHandler for RegisterHandler {
    fn is_default(&self) -> bool {
        true
    }

    #[instrument(skip(self, message), fields(participant = %message.participant))]
    async fn execute(&self, message: &BotMessage) -> AppResult<String> {
        let event = match &message.content {
            Content::Text(text) => Event::Text(text.clone()),
            Content::Photo(file_id) => {
                debug!("Photo received: {}", file_id);
                Event::Photo(file_id.clone())
            }
        };

        let prompt = self
            .registrar
            .handle(ParticipantId(message.participant), event)
            .await;
        Ok(prompt.text().into())
    }
}
