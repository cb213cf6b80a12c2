//! Poll aggregate: lifecycle status, meeting modality, and the validated
//! draft from which a poll and its slots/participants are materialised.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::participant::{Participant, ParticipantDraft};
use super::slot::{SlotDraft, SlotId, TimeSlot};

/// Poll duration applied when a draft does not specify one, in minutes.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Stable poll identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PollId(Uuid);

impl PollId {
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

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Poll lifecycle status.
///
/// The spellings round-trip through storage and the API verbatim:
/// `draft`, `active`, `completed`, `cancelled`, `expired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PollStatus {
    /// Created but not yet open for voting. Unused in practice; polls open
    /// immediately on creation.
    Draft,
    /// Open for participant responses.
    Active,
    /// Consensus reached; a winning slot is selected. Terminal.
    Completed,
    /// Withdrawn by an operator before completion. Terminal.
    Cancelled,
    /// Closed by a scheduler or operator without consensus. Terminal.
    Expired,
}

impl PollStatus {
    /// Whether the status admits no further transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Expired)
    }
}

impl fmt::Display for PollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for PollStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "expired" => Ok(Self::Expired),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// Error returned when parsing an unrecognised status string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown poll status: {0}")]
pub struct UnknownStatus(String);

/// How the finalized meeting is held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MeetingModality {
    /// Hosted video conference; finalization books a meeting link.
    #[default]
    Video,
    /// Everyone meets in one place; no video booking.
    InPerson,
    /// Dial-in call; no video booking.
    Phone,
}

impl MeetingModality {
    /// Whether finalization should request a hosted video meeting.
    pub const fn requires_video_link(self) -> bool {
        matches!(self, Self::Video)
    }
}

impl fmt::Display for MeetingModality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Video => "video",
            Self::InPerson => "in_person",
            Self::Phone => "phone",
        };
        f.write_str(s)
    }
}

/// External references captured during finalization.
///
/// Every field stays `None` when the corresponding step failed or was
/// disabled; partial results are persisted as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalizationRefs {
    /// Identifier of the booked video meeting.
    pub video_meeting_id: Option<String>,
    /// Join URL of the booked video meeting.
    pub video_join_url: Option<String>,
    /// Identifier of the created calendar event.
    pub calendar_event_id: Option<String>,
}

impl FinalizationRefs {
    /// True when no step produced a reference.
    pub const fn is_empty(&self) -> bool {
        self.video_meeting_id.is_none()
            && self.video_join_url.is_none()
            && self.calendar_event_id.is_none()
    }
}

/// Validation errors raised while materialising a [`PollDraft`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollValidationError {
    /// Title is empty after trimming.
    #[error("poll title must not be empty")]
    EmptyTitle,
    /// Duration must be a positive number of minutes.
    #[error("poll duration must be at least one minute")]
    InvalidDuration,
    /// A poll needs at least one candidate slot.
    #[error("poll must contain at least one time slot")]
    NoSlots,
    /// A poll needs at least one participant.
    #[error("poll must contain at least one participant")]
    NoParticipants,
    /// A slot's end instant does not come after its start.
    #[error("time slot must end after it starts")]
    InvalidSlotWindow,
    /// A participant's name is empty after trimming.
    #[error("participant name must not be empty")]
    EmptyParticipantName,
    /// A participant's email address is missing or malformed.
    #[error("participant email {email:?} is not a valid address")]
    InvalidParticipantEmail {
        /// The offending address as submitted.
        email: String,
    },
    /// Two participants share one address within the poll.
    #[error("participant email {email:?} appears more than once")]
    DuplicateParticipantEmail {
        /// The duplicated address.
        email: String,
    },
}

/// Unvalidated poll creation input.
///
/// Built by inbound adapters from request payloads; [`NewPoll::try_from_draft`]
/// validates it and materialises identifiers and capability tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollDraft {
    /// Meeting title shown to participants.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Meeting length in minutes; `None` applies [`DEFAULT_DURATION_MINUTES`].
    pub duration_minutes: Option<u32>,
    /// How the meeting will be held; `None` applies the default modality.
    pub modality: Option<MeetingModality>,
    /// Candidate time windows.
    pub slots: Vec<SlotDraft>,
    /// Invitees whose availability is being collected.
    pub participants: Vec<ParticipantDraft>,
}

/// A freshly materialised poll with its slots and participants.
///
/// Produced by [`NewPoll::try_from_draft`]; persisted atomically by the
/// repository so a partial write never leaves an active poll behind.
#[derive(Debug, Clone)]
pub struct NewPoll {
    /// The poll record, already in [`PollStatus::Active`].
    pub poll: Poll,
    /// Candidate slots with zeroed tallies.
    pub slots: Vec<TimeSlot>,
    /// Participants, each holding a freshly generated capability token.
    pub participants: Vec<Participant>,
}

impl NewPoll {
    /// Validate `draft` and materialise the poll aggregate.
    ///
    /// # Errors
    /// Returns the first violated constraint as a [`PollValidationError`].
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{NewPoll, ParticipantDraft, PollDraft, SlotDraft};
    /// use chrono::{Duration, Utc};
    ///
    /// let start = Utc::now();
    /// let draft = PollDraft {
    ///     title: "Team sync".into(),
    ///     description: None,
    ///     duration_minutes: None,
    ///     modality: None,
    ///     slots: vec![SlotDraft::new(start, start + Duration::minutes(30))],
    ///     participants: vec![ParticipantDraft::new("Ada", "ada@example.com")],
    /// };
    /// let created = NewPoll::try_from_draft(draft, Utc::now()).expect("valid draft");
    /// assert_eq!(created.slots.len(), 1);
    /// ```
    pub fn try_from_draft(
        draft: PollDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, PollValidationError> {
        let title = draft.title.trim().to_owned();
        if title.is_empty() {
            return Err(PollValidationError::EmptyTitle);
        }
        let duration_minutes = draft.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
        if duration_minutes == 0 {
            return Err(PollValidationError::InvalidDuration);
        }
        if draft.slots.is_empty() {
            return Err(PollValidationError::NoSlots);
        }
        if draft.participants.is_empty() {
            return Err(PollValidationError::NoParticipants);
        }

        let poll_id = PollId::random();
        let slots = draft
            .slots
            .into_iter()
            .map(|slot| TimeSlot::try_from_draft(poll_id, slot))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        let participants = draft
            .participants
            .into_iter()
            .map(|participant| {
                let participant = Participant::try_from_draft(poll_id, participant)?;
                if !seen.insert(participant.email().to_ascii_lowercase()) {
                    return Err(PollValidationError::DuplicateParticipantEmail {
                        email: participant.email().to_owned(),
                    });
                }
                Ok(participant)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let poll = Poll {
            id: poll_id,
            title,
            description: draft
                .description
                .map(|d| d.trim().to_owned())
                .filter(|d| !d.is_empty()),
            duration_minutes,
            modality: draft.modality.unwrap_or_default(),
            status: PollStatus::Active,
            selected_slot_id: None,
            finalization: FinalizationRefs::default(),
            created_at,
        };

        Ok(Self {
            poll,
            slots,
            participants,
        })
    }
}

/// Error returned by guarded status transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("poll is {actual}, transition requires {required}")]
pub struct InvalidTransition {
    /// Status the transition requires.
    pub required: PollStatus,
    /// Status the poll actually holds.
    pub actual: PollStatus,
}

/// A scheduling poll.
///
/// All lifecycle mutations go through the guarded transition methods;
/// `selected_slot_id` is set exactly when the poll completes, keeping the
/// "selected slot iff completed" invariant inside the type.
#[derive(Debug, Clone, PartialEq)]
pub struct Poll {
    id: PollId,
    title: String,
    description: Option<String>,
    duration_minutes: u32,
    modality: MeetingModality,
    status: PollStatus,
    selected_slot_id: Option<SlotId>,
    finalization: FinalizationRefs,
    created_at: DateTime<Utc>,
}

impl Poll {
    /// Poll identifier.
    pub const fn id(&self) -> PollId {
        self.id
    }

    /// Meeting title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Optional description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Meeting length in minutes.
    pub const fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// How the meeting will be held.
    pub const fn modality(&self) -> MeetingModality {
        self.modality
    }

    /// Current lifecycle status.
    pub const fn status(&self) -> PollStatus {
        self.status
    }

    /// Winning slot, present exactly when the poll is completed.
    pub const fn selected_slot_id(&self) -> Option<SlotId> {
        self.selected_slot_id
    }

    /// References captured during finalization.
    pub const fn finalization(&self) -> &FinalizationRefs {
        &self.finalization
    }

    /// Creation instant.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Complete the poll, selecting `winner`.
    ///
    /// Only an `active` poll may complete; a concurrent caller that lost the
    /// race observes [`InvalidTransition`] and must treat it as "someone else
    /// completed the poll", not as a failure.
    ///
    /// # Errors
    /// Returns [`InvalidTransition`] when the poll is not `active`.
    pub fn complete(&mut self, winner: SlotId) -> Result<(), InvalidTransition> {
        self.guard_active()?;
        self.status = PollStatus::Completed;
        self.selected_slot_id = Some(winner);
        Ok(())
    }

    /// Cancel an active poll.
    ///
    /// # Errors
    /// Returns [`InvalidTransition`] when the poll is not `active`.
    pub fn cancel(&mut self) -> Result<(), InvalidTransition> {
        self.guard_active()?;
        self.status = PollStatus::Cancelled;
        Ok(())
    }

    /// Expire an active poll.
    ///
    /// # Errors
    /// Returns [`InvalidTransition`] when the poll is not `active`.
    pub fn expire(&mut self) -> Result<(), InvalidTransition> {
        self.guard_active()?;
        self.status = PollStatus::Expired;
        Ok(())
    }

    /// Record finalization references obtained for a completed poll.
    ///
    /// Partial results are stored as-is; missing fields stay `None`.
    pub fn record_finalization(&mut self, refs: FinalizationRefs) {
        self.finalization = refs;
    }

    const fn guard_active(&self) -> Result<(), InvalidTransition> {
        match self.status {
            PollStatus::Active => Ok(()),
            actual => Err(InvalidTransition {
                required: PollStatus::Active,
                actual,
            }),
        }
    }
}
