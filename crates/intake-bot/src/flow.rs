//! Registration state machine.
//!
//! [`transition`] is pure: it takes the participant's current session and
//! an event, and returns the session to store plus what should happen next.
//! It never fails; wrong or early input just yields a prompt.

use session_store::{ParticipantId, Session, Step};
use telegram_client::FileId;

/// Normalized registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start,
    Text(String),
    Photo(FileId),
}

/// Snapshot of a finished registration, handed to the admin relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub participant: ParticipantId,
    pub name: String,
    pub phone: String,
    pub receipt: FileId,
}

impl Submission {
    /// Summary line sent to the operator.
    pub fn summary(&self) -> String {
        format!(
            "Name: {}, Phone: {}, ID: {}",
            self.name, self.phone, self.participant
        )
    }

    /// Caption for the forwarded receipt photo.
    pub fn caption(&self) -> String {
        format!("Payment receipt (ID: {})", self.participant)
    }

    /// Rebuild the session this submission was taken from.
    pub fn into_session(self) -> Session {
        Session::awaiting_photo(self.name, self.phone)
    }
}

/// Replies sent back to the participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Instructions,
    NotStarted,
    NameReceived,
    PhoneReceived,
    /// Photo sent while the name is still missing.
    NameExpected,
    /// Photo sent while the phone number is still missing.
    PhoneExpected,
    /// Text sent while the receipt photo is expected.
    PhotoExpected,
    Submitted,
    RelayFailed,
    /// Relay failed after the participant had already started over.
    RelayFailedRestarted,
}

impl Prompt {
    pub fn text(&self) -> &'static str {
        match self {
            Prompt::Instructions => {
                "🎓 Training Registration\n\n\
                 To complete your registration:\n\n\
                 1️⃣ Pay the registration fee.\n\
                 2️⃣ Send your FULL NAME.\n\
                 3️⃣ Send your PHONE NUMBER.\n\
                 4️⃣ Send a PHOTO of your payment receipt.\n\n\
                 Please send your FULL NAME now."
            }
            Prompt::NotStarted => "Please press /start first.",
            Prompt::NameReceived => "✅ Name received.\nNow send your PHONE NUMBER.",
            Prompt::PhoneReceived => {
                "✅ Phone received.\nNow send a PHOTO of your payment receipt."
            }
            Prompt::NameExpected => "Please send your FULL NAME first.",
            Prompt::PhoneExpected => "Please send your PHONE NUMBER first.",
            Prompt::PhotoExpected => "Please send a PHOTO of your payment receipt, not text.",
            Prompt::Submitted => {
                "🎉 Registration submitted successfully!\n\
                 Please wait for admin confirmation."
            }
            Prompt::RelayFailed => {
                "⚠️ We could not deliver your registration right now.\n\
                 Your details are saved. Please send the PHOTO of your receipt again."
            }
            Prompt::RelayFailedRestarted => {
                "⚠️ We could not deliver your previous registration.\n\
                 Your new registration continues. Please send your FULL NAME."
            }
        }
    }
}

/// What the caller must do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Reply(Prompt),
    /// The session is complete and already removed; relay this.
    Submit(Submission),
}

/// Decide the next session state and outcome for an event.
///
/// A returned `None` session means the participant has no session afterwards.
pub fn transition(
    participant: ParticipantId,
    current: Option<Session>,
    event: Event,
) -> (Option<Session>, Outcome) {
    match (current, event) {
        // Start always resets, dropping whatever was collected so far.
        (_, Event::Start) => reply(Some(Session::new()), Prompt::Instructions),
        (None, _) => reply(None, Prompt::NotStarted),
        (Some(mut session), Event::Text(text)) => match session.step() {
            Step::AwaitingName => {
                session.record_name(text);
                reply(Some(session), Prompt::NameReceived)
            }
            Step::AwaitingPhone => {
                session.record_phone(text);
                reply(Some(session), Prompt::PhoneReceived)
            }
            Step::AwaitingPhoto => reply(Some(session), Prompt::PhotoExpected),
            // Never stored, handled like a missing session.
            Step::Completed => reply(None, Prompt::NotStarted),
        },
        (Some(mut session), Event::Photo(receipt)) => match session.step() {
            Step::AwaitingName => reply(Some(session), Prompt::NameExpected),
            Step::AwaitingPhone => reply(Some(session), Prompt::PhoneExpected),
            Step::AwaitingPhoto => match session.complete() {
                Some((name, phone)) => (
                    None,
                    Outcome::Submit(Submission {
                        participant,
                        name,
                        phone,
                        receipt,
                    }),
                ),
                None => reply(None, Prompt::NotStarted),
            },
            Step::Completed => reply(None, Prompt::NotStarted),
        },
    }
}

fn reply(session: Option<Session>, prompt: Prompt) -> (Option<Session>, Outcome) {
    (session, Outcome::Reply(prompt))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: ParticipantId = ParticipantId(42);

    fn text(t: &str) -> Event {
        Event::Text(t.into())
    }

    fn photo(id: &str) -> Event {
        Event::Photo(FileId::new(id))
    }

    fn awaiting_phone() -> Session {
        let mut session = Session::new();
        session.record_name("Jane Doe");
        session
    }

    #[test]
    fn test_start_creates_session() {
        let (session, outcome) = transition(ID, None, Event::Start);

        assert_eq!(session.unwrap().step(), Step::AwaitingName);
        assert_eq!(outcome, Outcome::Reply(Prompt::Instructions));
    }

    #[test]
    fn test_start_discards_unfinished_data() {
        for current in [Session::new(), awaiting_phone(), Session::awaiting_photo("Jane", "555")] {
            let (session, outcome) = transition(ID, Some(current), Event::Start);
            let session = session.unwrap();

            assert_eq!(session.step(), Step::AwaitingName);
            assert!(session.name().is_none());
            assert!(session.phone().is_none());
            assert_eq!(outcome, Outcome::Reply(Prompt::Instructions));
        }
    }

    #[test]
    fn test_input_without_session_is_not_started() {
        for event in [text("Jane Doe"), photo("img:abc")] {
            let (session, outcome) = transition(ID, None, event);
            assert!(session.is_none());
            assert_eq!(outcome, Outcome::Reply(Prompt::NotStarted));
        }
    }

    #[test]
    fn test_name_is_stored_verbatim() {
        let raw = "  jane   DOE 🙂 ";
        let (session, outcome) = transition(ID, Some(Session::new()), text(raw));
        let session = session.unwrap();

        assert_eq!(session.step(), Step::AwaitingPhone);
        assert_eq!(session.name(), Some(raw));
        assert_eq!(outcome, Outcome::Reply(Prompt::NameReceived));
    }

    #[test]
    fn test_phone_is_not_validated() {
        let (session, outcome) = transition(ID, Some(awaiting_phone()), text("call me maybe"));
        let session = session.unwrap();

        assert_eq!(session.step(), Step::AwaitingPhoto);
        assert_eq!(session.name(), Some("Jane Doe"));
        assert_eq!(session.phone(), Some("call me maybe"));
        assert_eq!(outcome, Outcome::Reply(Prompt::PhoneReceived));
    }

    #[test]
    fn test_early_photo_keeps_session() {
        let (session, outcome) = transition(ID, Some(Session::new()), photo("img:abc"));
        assert_eq!(session.unwrap().step(), Step::AwaitingName);
        assert_eq!(outcome, Outcome::Reply(Prompt::NameExpected));

        let (session, outcome) = transition(ID, Some(awaiting_phone()), photo("img:abc"));
        let session = session.unwrap();
        assert_eq!(session.step(), Step::AwaitingPhone);
        assert_eq!(session.name(), Some("Jane Doe"));
        assert_eq!(outcome, Outcome::Reply(Prompt::PhoneExpected));
    }

    #[test]
    fn test_text_while_awaiting_photo() {
        let current = Session::awaiting_photo("Jane Doe", "555-0100");
        let (session, outcome) = transition(ID, Some(current.clone()), text("here it is"));

        assert_eq!(session, Some(current));
        assert_eq!(outcome, Outcome::Reply(Prompt::PhotoExpected));
    }

    #[test]
    fn test_photo_completes_and_removes() {
        let current = Session::awaiting_photo("Jane Doe", "555-0100");
        let (session, outcome) = transition(ID, Some(current), photo("img:abc"));

        assert!(session.is_none());
        let Outcome::Submit(submission) = outcome else {
            panic!("expected a submission");
        };
        assert_eq!(submission.participant, ID);
        assert_eq!(submission.name, "Jane Doe");
        assert_eq!(submission.phone, "555-0100");
        assert_eq!(submission.receipt, FileId::new("img:abc"));
        assert_eq!(submission.summary(), "Name: Jane Doe, Phone: 555-0100, ID: 42");
    }

    #[test]
    fn test_submission_round_trips_to_session() {
        let submission = Submission {
            participant: ID,
            name: "Jane Doe".into(),
            phone: "555-0100".into(),
            receipt: FileId::new("img:abc"),
        };

        let session = submission.into_session();
        assert_eq!(session.step(), Step::AwaitingPhoto);
        assert_eq!(session.name(), Some("Jane Doe"));
        assert_eq!(session.phone(), Some("555-0100"));
    }

    #[test]
    fn test_completed_session_is_treated_as_missing() {
        for event in [text("Jane Doe"), photo("img:1")] {
            let mut done = Session::awaiting_photo("Jane Doe", "555-0100");
            done.complete();

            let (session, outcome) = transition(ID, Some(done), event);
            assert!(session.is_none());
            assert_eq!(outcome, Outcome::Reply(Prompt::NotStarted));
        }
    }
}
