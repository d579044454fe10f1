//! Bot command handlers.

mod help;
mod myid;
mod register;
mod start;

pub use help::HelpHandler;
pub use myid::MyIdHandler;
pub use register::RegisterHandler;
pub use start::StartHandler;

use crate::error::AppResult;
use async_trait::async_trait;
use telegram_client::BotMessage;

/// Command handler trait.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Command name without the slash (e.g., "start").
    fn command(&self) -> Option<&str> {
        None
    }

    /// Whether this is the default handler for non-command messages.
    fn is_default(&self) -> bool {
        false
    }

    /// Check if this handler matches the message.
    ///
    /// Unknown commands match nothing and are ignored.
    fn matches(&self, message: &BotMessage) -> bool {
        match (self.command(), message.command()) {
            (Some(command), Some(sent)) => command == sent,
            (None, None) => self.is_default(),
            _ => false,
        }
    }

    /// Execute the command, returning the reply text.
    async fn execute(&self, message: &BotMessage) -> AppResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use telegram_client::{Content, FileId};

    fn message(content: Content) -> BotMessage {
        BotMessage {
            participant: 42,
            chat_id: 42,
            sender_name: "Jane".into(),
            content,
            timestamp: 0,
        }
    }

    #[test]
    fn test_command_matching() {
        let help = HelpHandler::new();

        assert!(help.matches(&message(Content::Text("/help".into()))));
        assert!(help.matches(&message(Content::Text("/help@IntakeBot".into()))));
        assert!(!help.matches(&message(Content::Text("/start".into()))));
        assert!(!help.matches(&message(Content::Text("help".into()))));
        assert!(!help.matches(&message(Content::Photo(FileId::new("x")))));
    }

    #[tokio::test]
    async fn test_myid_reports_participant() {
        let handler = MyIdHandler::new();
        let msg = message(Content::Text("/myid".into()));

        assert!(handler.matches(&msg));
        assert_eq!(handler.execute(&msg).await.unwrap(), "Your ID: 42");
    }

    #[tokio::test]
    async fn test_help_lists_commands() {
        let reply = HelpHandler::new()
            .execute(&message(Content::Text("/help".into())))
            .await
            .unwrap();

        assert!(reply.contains("/start"));
        assert!(reply.contains("/myid"));
    }
}
