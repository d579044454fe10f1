//! Routes normalized messages to command handlers and sends the reply.

use crate::commands::*;
use crate::registrar::Registrar;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use telegram_client::{BotMessage, TelegramClient};
use tracing::{debug, error};

/// Pending messages per participant. A participant has an entry exactly
/// while a worker task is draining their queue.
type Queues = Mutex<HashMap<i64, VecDeque<BotMessage>>>;

pub struct Dispatcher {
    handlers: Vec<Box<dyn CommandHandler>>,
    telegram: Arc<TelegramClient>,
    queues: Queues,
}

impl Dispatcher {
    pub fn new(telegram: Arc<TelegramClient>, handlers: Vec<Box<dyn CommandHandler>>) -> Self {
        Self {
            handlers,
            telegram,
            queues: Mutex::new(HashMap::new()),
        }
    }

    /// Dispatcher with the registration flow and the auxiliary commands.
    pub fn with_registrar(telegram: Arc<TelegramClient>, registrar: Arc<Registrar>) -> Self {
        let handlers: Vec<Box<dyn CommandHandler>> = vec![
            Box::new(StartHandler::new(registrar.clone())),
            Box::new(MyIdHandler::new()),
            Box::new(HelpHandler::new()),
            Box::new(RegisterHandler::new(registrar)),
        ];
        Self::new(telegram, handlers)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Queue a message for background handling.
    ///
    /// Messages from one participant are handled one at a time in the order
    /// they were enqueued. Different participants proceed in parallel.
    pub fn enqueue(self: &Arc<Self>, message: BotMessage) {
        let participant = message.participant;
        {
            let mut queues = lock(&self.queues);
            if let Some(queue) = queues.get_mut(&participant) {
                queue.push_back(message);
                return;
            }
            queues.insert(participant, VecDeque::from([message]));
        }

        let dispatcher = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(message) = dispatcher.next_queued(participant) {
                dispatcher.dispatch(message).await;
            }
        });
    }

    /// Pop the participant's next message, retiring the queue when empty.
    fn next_queued(&self, participant: i64) -> Option<BotMessage> {
        let mut queues = lock(&self.queues);
        let next = queues.get_mut(&participant).and_then(VecDeque::pop_front);
        if next.is_none() {
            queues.remove(&participant);
        }
        next
    }

    /// Number of participants with messages still being handled.
    pub fn busy_participants(&self) -> usize {
        lock(&self.queues).len()
    }

    /// Handle one message end to end. Never fails; errors are logged and
    /// turned into a generic reply.
    pub async fn dispatch(&self, message: BotMessage) {
        debug!(
            participant = message.participant,
            sender = %message.sender_name,
            sent_at = message.timestamp,
            "Dispatching message"
        );

        let Some(handler) = self.handlers.iter().find(|h| h.matches(&message)) else {
            debug!("No handler for message from {}", message.participant);
            return;
        };

        match handler.execute(&message).await {
            Ok(response) => {
                if let Err(e) = self.telegram.reply(&message, &response).await {
                    error!("Failed to send reply: {}", e);
                }
            }
            Err(e) => {
                error!("Handler error: {}", e);
                let _ = self
                    .telegram
                    .reply(&message, "Sorry, something went wrong.")
                    .await;
            }
        }
    }
}

fn lock(queues: &Queues) -> std::sync::MutexGuard<'_, HashMap<i64, VecDeque<BotMessage>>> {
    // Only plain map operations run under the lock, so a poisoned guard is still consistent.
    queues.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
