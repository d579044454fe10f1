//! Forwards completed registrations to the operator.

use crate::flow::Submission;
use std::sync::Arc;
use telegram_client::{TelegramClient, TelegramError};
use thiserror::Error;
use tracing::{error, instrument};

/// Relay failure. Names the send(s) that failed.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("summary send failed: {0}")]
    Summary(TelegramError),

    #[error("receipt send failed: {0}")]
    Receipt(TelegramError),

    #[error("summary and receipt sends failed: {summary}; {receipt}")]
    Both {
        summary: TelegramError,
        receipt: TelegramError,
    },
}

/// Acknowledgement of a delivered submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayAck {
    pub admin_chat_id: i64,
}

/// Sends submissions to the single configured operator chat.
pub struct AdminRelay {
    telegram: Arc<TelegramClient>,
    admin_chat_id: i64,
}

impl AdminRelay {
    pub fn new(telegram: Arc<TelegramClient>, admin_chat_id: i64) -> Self {
        Self {
            telegram,
            admin_chat_id,
        }
    }

    /// Send the text summary, then the receipt photo.
    ///
    /// The photo is attempted even when the summary fails; either failure
    /// fails the relay.
    #[instrument(skip(self, submission), fields(participant = %submission.participant))]
    pub async fn relay(&self, submission: &Submission) -> Result<RelayAck, RelayError> {
        let summary = self
            .telegram
            .send_message(self.admin_chat_id, &submission.summary())
            .await;

        let receipt = self
            .telegram
            .send_photo(
                self.admin_chat_id,
                &submission.receipt,
                Some(&submission.caption()),
            )
            .await;

        match (summary, receipt) {
            (Ok(()), Ok(())) => Ok(RelayAck {
                admin_chat_id: self.admin_chat_id,
            }),
            (Err(summary), Ok(())) => {
                error!("Failed to send summary to admin: {}", summary);
                Err(RelayError::Summary(summary))
            }
            (Ok(()), Err(receipt)) => {
                error!("Failed to send receipt to admin: {}", receipt);
                Err(RelayError::Receipt(receipt))
            }
            (Err(summary), Err(receipt)) => {
                error!("Failed to send summary and receipt to admin");
                Err(RelayError::Both { summary, receipt })
            }
        }
    }
}
