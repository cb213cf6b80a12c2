//! Participants and the capability tokens that stand in for login.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::poll::{PollId, PollValidationError};

/// Number of alphanumeric characters in a generated token.
const TOKEN_LENGTH: usize = 32;

/// Stable participant identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ParticipantId(Uuid);

impl ParticipantId {
    /// Wrap an existing UUID.
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque bearer capability granting a participant access to their ballot.
///
/// Generated once from OS entropy at participant creation, never derived
/// from other fields, compared by exact match. The `Debug` form is redacted
/// so tokens do not leak into logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(String);

impl AccessToken {
    /// Generate a fresh token from OS entropy.
    pub fn generate() -> Self {
        let raw: String = OsRng
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();
        Self(raw)
    }

    /// Wrap a token received from a caller for exact-match lookup.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the token for embedding in a voting link.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(redacted)")
    }
}

/// Build the voting link for one participant.
///
/// # Examples
/// ```
/// use backend::domain::{AccessToken, PollId, voting_link};
/// use uuid::Uuid;
///
/// let poll_id = PollId::new(Uuid::nil());
/// let token = AccessToken::new("abc123");
/// let link = voting_link("https://meet.example.com/", poll_id, &token);
/// assert_eq!(
///     link,
///     "https://meet.example.com/poll/00000000-0000-0000-0000-000000000000?token=abc123"
/// );
/// ```
pub fn voting_link(base_url: &str, poll_id: PollId, token: &AccessToken) -> String {
    format!(
        "{}/poll/{}?token={}",
        base_url.trim_end_matches('/'),
        poll_id,
        token.as_str()
    )
}

/// Unvalidated invitee supplied at poll creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantDraft {
    /// Display name.
    pub name: String,
    /// Email address, unique within the poll.
    pub email: String,
}

impl ParticipantDraft {
    /// Build a draft invitee.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// An invitee whose availability is being collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    id: ParticipantId,
    poll_id: PollId,
    name: String,
    email: String,
    token: AccessToken,
    has_responded: bool,
    responded_at: Option<DateTime<Utc>>,
}

impl Participant {
    /// Validate `draft`, attach it to `poll_id`, and issue a fresh token.
    ///
    /// # Errors
    /// Returns a [`PollValidationError`] when the name is empty or the email
    /// address is malformed. Cross-participant uniqueness is checked by the
    /// poll draft, which sees the whole set.
    pub fn try_from_draft(
        poll_id: PollId,
        draft: ParticipantDraft,
    ) -> Result<Self, PollValidationError> {
        let name = draft.name.trim().to_owned();
        if name.is_empty() {
            return Err(PollValidationError::EmptyParticipantName);
        }
        let email = draft.email.trim().to_owned();
        if !is_plausible_email(&email) {
            return Err(PollValidationError::InvalidParticipantEmail { email });
        }
        Ok(Self {
            id: ParticipantId::random(),
            poll_id,
            name,
            email,
            token: AccessToken::generate(),
            has_responded: false,
            responded_at: None,
        })
    }

    /// Participant identifier.
    pub const fn id(&self) -> ParticipantId {
        self.id
    }

    /// Owning poll.
    pub const fn poll_id(&self) -> PollId {
        self.poll_id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Capability token; the sole credential for this participant's ballot.
    pub const fn token(&self) -> &AccessToken {
        &self.token
    }

    /// Whether this participant has submitted at least once.
    pub const fn has_responded(&self) -> bool {
        self.has_responded
    }

    /// Instant of the most recent submission.
    pub const fn responded_at(&self) -> Option<DateTime<Utc>> {
        self.responded_at
    }

    /// Record a submission at `at`, returning whether it was the first.
    ///
    /// Resubmission is allowed; it refreshes the timestamp and reports
    /// `false` so callers can distinguish revisions from first answers.
    pub fn mark_responded(&mut self, at: DateTime<Utc>) -> bool {
        let first = !self.has_responded;
        self.has_responded = true;
        self.responded_at = Some(at);
        first
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !email.contains(char::is_whitespace)
                && !domain.contains('@')
        }
        None => false,
    }
}
