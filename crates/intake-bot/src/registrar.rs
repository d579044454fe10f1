//! Applies registration transitions and dispatches completed submissions.

use crate::flow::{self, Event, Outcome, Prompt, Submission};
use crate::relay::AdminRelay;
use session_store::{ParticipantId, SessionStore};
use tracing::{debug, info, instrument, warn};

/// Owns the session store and the admin relay.
///
/// Each event is applied with a single atomic store update. A completed
/// session leaves the store inside that update, before the relay is sent,
/// so a duplicate photo delivered meanwhile finds no session and cannot
/// trigger a second relay.
pub struct Registrar {
    sessions: SessionStore,
    relay: AdminRelay,
}

impl Registrar {
    pub fn new(sessions: SessionStore, relay: AdminRelay) -> Self {
        Self { sessions, relay }
    }

    /// Handle one event for a participant and return the reply.
    #[instrument(skip(self, event), fields(participant = %participant))]
    pub async fn handle(&self, participant: ParticipantId, event: Event) -> Prompt {
        let outcome = self
            .sessions
            .update(participant, |current| {
                flow::transition(participant, current, event)
            })
            .await;

        match outcome {
            Outcome::Reply(prompt) => {
                debug!(?prompt, "Transition applied");
                prompt
            }
            Outcome::Submit(submission) => self.submit(submission).await,
        }
    }

    async fn submit(&self, submission: Submission) -> Prompt {
        let participant = submission.participant;

        match self.relay.relay(&submission).await {
            Ok(ack) => {
                info!(
                    "Registration for {} relayed to admin chat {}",
                    participant, ack.admin_chat_id
                );
                Prompt::Submitted
            }
            Err(e) => {
                warn!("Relay failed for {}: {}", participant, e);
                // Keep the data so the participant can resend the photo,
                // unless they started over while the relay was in flight.
                if self
                    .sessions
                    .restore(participant, submission.into_session())
                    .await
                {
                    Prompt::RelayFailed
                } else {
                    debug!("Newer session exists for {}, dropped failed submission", participant);
                    Prompt::RelayFailedRestarted
                }
            }
        }
    }
}
