//! Registration session types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a chat participant (the Telegram user id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub i64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ParticipantId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Registration progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    AwaitingName,
    AwaitingPhone,
    AwaitingPhoto,
    /// Terminal. Completed sessions are never kept in the store.
    Completed,
}

/// An in-progress registration.
///
/// `name` is only set once the step is past `AwaitingName`, and `phone`
/// once it is past `AwaitingPhone`. The mutators below are the only way
/// to advance, so the invariant holds for any session built through them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    step: Step,
    name: Option<String>,
    phone: Option<String>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// A fresh session waiting for the participant's name.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            step: Step::AwaitingName,
            name: None,
            phone: None,
            started_at: now,
            updated_at: now,
        }
    }

    /// A session that already has name and phone and waits for the photo.
    pub fn awaiting_photo(name: impl Into<String>, phone: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.step = Step::AwaitingPhoto;
        session.name = Some(name.into());
        session.phone = Some(phone.into());
        session
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Store the name and advance to `AwaitingPhone`.
    ///
    /// Returns false, leaving the session untouched, unless the session is
    /// at `AwaitingName`.
    pub fn record_name(&mut self, name: impl Into<String>) -> bool {
        if self.step != Step::AwaitingName {
            return false;
        }
        self.name = Some(name.into());
        self.advance(Step::AwaitingPhone);
        true
    }

    /// Store the phone number and advance to `AwaitingPhoto`.
    ///
    /// Returns false, leaving the session untouched, unless the session is
    /// at `AwaitingPhone`.
    pub fn record_phone(&mut self, phone: impl Into<String>) -> bool {
        if self.step != Step::AwaitingPhone {
            return false;
        }
        self.phone = Some(phone.into());
        self.advance(Step::AwaitingPhoto);
        true
    }

    /// Mark the session completed, handing back name and phone.
    ///
    /// Only valid at `AwaitingPhoto`; returns None otherwise.
    pub fn complete(&mut self) -> Option<(String, String)> {
        if self.step != Step::AwaitingPhoto {
            return None;
        }
        let name = self.name.clone()?;
        let phone = self.phone.clone()?;
        self.advance(Step::Completed);
        Some((name, phone))
    }

    pub fn is_completed(&self) -> bool {
        self.step == Step::Completed
    }

    fn advance(&mut self, step: Step) {
        self.step = step;
        self.updated_at = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
