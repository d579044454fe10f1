//! Update receiver using long polling.

use crate::client::TelegramClient;
use crate::types::*;
use std::time::Duration;
use tokio::time::sleep;
use tokio_stream::Stream;
use tracing::{debug, error};

/// Receiver that long-polls `getUpdates` for new messages.
pub struct UpdateReceiver {
    client: TelegramClient,
    poll_timeout: Duration,
}

impl UpdateReceiver {
    /// Create a new update receiver.
    pub fn new(client: TelegramClient, poll_timeout: Duration) -> Self {
        Self {
            client,
            poll_timeout,
        }
    }

    /// Start receiving messages as an async stream.
    ///
    /// Updates that do not normalize into a [`BotMessage`] are acknowledged
    /// and skipped.
    pub fn stream(self) -> impl Stream<Item = BotMessage> {
        async_stream::stream! {
            let mut offset: Option<i64> = None;

            loop {
                match self.client.get_updates(offset, self.poll_timeout).await {
                    Ok(updates) => {
                        for update in updates {
                            offset = Some(update.update_id + 1);

                            if let Some(bot_msg) = BotMessage::from_update(&update) {
                                debug!("Received update {} from {}", update.update_id, bot_msg.participant);
                                yield bot_msg;
                            }
                        }
                    }
                    Err(e) => {
                        error!("Receive error: {}", e);
                        // Back off on error
                        sleep(Duration::from_secs(5)).await;
                    }
                }
            }
        }
    }
}
