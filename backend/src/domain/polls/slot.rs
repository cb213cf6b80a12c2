//! Candidate time slots and their cached response tallies.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::poll::{PollId, PollValidationError};
use crate::domain::scoring;

/// Stable slot identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct SlotId(Uuid);

impl SlotId {
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

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unvalidated candidate time window supplied at poll creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDraft {
    /// Proposed start instant.
    pub start_time: DateTime<Utc>,
    /// Proposed end instant; must come after the start.
    pub end_time: DateTime<Utc>,
}

impl SlotDraft {
    /// Build a draft window.
    pub const fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time,
        }
    }
}

/// A candidate meeting time within a poll.
///
/// `available_count` and `total_responses` are derived caches, recomputed
/// from response rows by the repository; nothing increments them in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    id: SlotId,
    poll_id: PollId,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    available_count: u32,
    total_responses: u32,
}

impl TimeSlot {
    /// Validate `draft` and attach it to `poll_id` with zeroed tallies.
    ///
    /// # Errors
    /// Returns [`PollValidationError::InvalidSlotWindow`] when the window
    /// does not end after it starts.
    pub fn try_from_draft(poll_id: PollId, draft: SlotDraft) -> Result<Self, PollValidationError> {
        if draft.end_time <= draft.start_time {
            return Err(PollValidationError::InvalidSlotWindow);
        }
        Ok(Self {
            id: SlotId::random(),
            poll_id,
            start_time: draft.start_time,
            end_time: draft.end_time,
            available_count: 0,
            total_responses: 0,
        })
    }

    /// Slot identifier.
    pub const fn id(&self) -> SlotId {
        self.id
    }

    /// Owning poll.
    pub const fn poll_id(&self) -> PollId {
        self.poll_id
    }

    /// Start instant.
    pub const fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// End instant.
    pub const fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Count of participants who marked themselves available.
    pub const fn available_count(&self) -> u32 {
        self.available_count
    }

    /// Count of responses received for this slot.
    pub const fn total_responses(&self) -> u32 {
        self.total_responses
    }

    /// Desirability score in `[0, 100]` derived from the cached tallies.
    pub fn score(&self) -> u8 {
        scoring::availability_score(self.available_count, self.total_responses)
    }

    /// Replace the cached tallies with freshly recomputed values.
    pub fn set_tallies(&mut self, available_count: u32, total_responses: u32) {
        self.available_count = available_count;
        self.total_responses = total_responses;
    }
}
