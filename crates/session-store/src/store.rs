//! In-memory session storage.

use crate::types::*;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// In-memory registration session store.
///
/// A single lock guards the whole map, so every operation, including the
/// read-modify-write in [`SessionStore::update`], is atomic with respect
/// to every other. Completed sessions are never stored.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<ParticipantId, Session>>>,
}

impl SessionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        info!("In-memory session store initialized");
        Self::default()
    }

    /// Get a participant's session.
    #[instrument(skip(self))]
    pub async fn get(&self, participant: ParticipantId) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions.get(&participant).cloned()
    }

    /// Insert or replace a participant's session.
    ///
    /// A completed session is dropped instead, removing any existing entry.
    #[instrument(skip(self, session))]
    pub async fn put(&self, participant: ParticipantId, session: Session) {
        let mut sessions = self.sessions.write().await;
        store_slot(&mut sessions, participant, Some(session));
    }

    /// Remove a participant's session. Returns whether one existed.
    #[instrument(skip(self))]
    pub async fn remove(&self, participant: ParticipantId) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(&participant).is_some();

        if removed {
            debug!("Removed session for {}", participant);
        }

        removed
    }

    /// Atomically read and rewrite a participant's session.
    ///
    /// `f` receives the current session (if any) and returns the session to
    /// store (None, or a completed session, removes the entry) along with a
    /// value handed back to the caller. No other operation on the store can
    /// interleave with `f`.
    pub async fn update<F, R>(&self, participant: ParticipantId, f: F) -> R
    where
        F: FnOnce(Option<Session>) -> (Option<Session>, R),
    {
        let mut sessions = self.sessions.write().await;
        let current = sessions.remove(&participant);
        let started_at = current.as_ref().map(|s| s.started_at);
        let (next, result) = f(current);

        match (&next, started_at) {
            (Some(session), _) if !session.is_completed() => debug!(
                participant = %participant,
                step = ?session.step(),
                started_at = %session.started_at,
                updated_at = %session.updated_at,
                "Session stored"
            ),
            (_, Some(started_at)) => debug!(
                participant = %participant,
                %started_at,
                open_for = ?(Utc::now() - started_at).to_std().unwrap_or_default(),
                "Session closed"
            ),
            _ => {}
        }

        store_slot(&mut sessions, participant, next);
        result
    }

    /// Put a session back unless the participant already has one.
    ///
    /// Returns whether the session was restored.
    #[instrument(skip(self, session))]
    pub async fn restore(&self, participant: ParticipantId, session: Session) -> bool {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&participant) {
            debug!("Not restoring session for {}: a newer one exists", participant);
            return false;
        }
        store_slot(&mut sessions, participant, Some(session));
        true
    }

    /// Number of in-flight sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn store_slot(
    sessions: &mut HashMap<ParticipantId, Session>,
    participant: ParticipantId,
    session: Option<Session>,
) {
    match session {
        Some(session) if !session.is_completed() => {
            sessions.insert(participant, session);
        }
        _ => {
            sessions.remove(&participant);
        }
    }
}
