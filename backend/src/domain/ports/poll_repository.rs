//! Port for poll persistence: aggregate reads, response upserts, tally
//! recomputation, and the guarded status transitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::polls::{
    AccessToken, FinalizationRefs, NewPoll, Participant, ParticipantId, Poll, PollId, SlotId,
    SlotResponse, TimeSlot,
};

/// Errors raised by poll repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollRepositoryError {
    /// Store connection could not be established.
    #[error("poll repository connection failed: {message}")]
    Connection {
        /// Adapter-reported cause.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("poll repository query failed: {message}")]
    Query {
        /// Adapter-reported cause.
        message: String,
    },
}

impl PollRepositoryError {
    /// Helper for connection related adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query execution errors.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for reading and mutating the poll aggregate.
///
/// Mutating methods that guard on status (`complete_poll`, `cancel_poll`,
/// `expire_poll`) return whether this call performed the transition, so a
/// caller that lost a race can tell "done by someone else" from "done by me".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PollRepository: Send + Sync {
    /// Persist a freshly materialised poll with its slots and participants.
    ///
    /// All-or-nothing: on failure nothing of the aggregate may remain.
    async fn create_poll(&self, new_poll: &NewPoll) -> Result<(), PollRepositoryError>;

    /// Find a poll by id.
    async fn find_poll(&self, poll_id: PollId) -> Result<Option<Poll>, PollRepositoryError>;

    /// List every poll, newest first.
    async fn list_polls(&self) -> Result<Vec<Poll>, PollRepositoryError>;

    /// List a poll's slots ordered by start time.
    async fn list_slots(&self, poll_id: PollId) -> Result<Vec<TimeSlot>, PollRepositoryError>;

    /// List a poll's participants in creation order.
    async fn list_participants(
        &self,
        poll_id: PollId,
    ) -> Result<Vec<Participant>, PollRepositoryError>;

    /// Resolve a capability token to a participant of the given poll.
    ///
    /// Exact-match comparison; `None` covers both unknown tokens and tokens
    /// belonging to another poll.
    async fn find_participant_by_token(
        &self,
        poll_id: PollId,
        token: &AccessToken,
    ) -> Result<Option<Participant>, PollRepositoryError>;

    /// Read the response rows a participant has on record.
    async fn responses_for_participant(
        &self,
        participant_id: ParticipantId,
    ) -> Result<Vec<SlotResponse>, PollRepositoryError>;

    /// Upsert response rows keyed by `(participant, slot)`.
    async fn upsert_responses(&self, responses: &[SlotResponse])
    -> Result<(), PollRepositoryError>;

    /// Mark a participant as having responded at `at`.
    ///
    /// Returns whether this was the participant's first submission.
    async fn mark_responded(
        &self,
        participant_id: ParticipantId,
        at: DateTime<Utc>,
    ) -> Result<bool, PollRepositoryError>;

    /// Recompute every slot tally of the poll from authoritative response
    /// rows and return the refreshed slots ordered by start time.
    async fn refresh_slot_tallies(
        &self,
        poll_id: PollId,
    ) -> Result<Vec<TimeSlot>, PollRepositoryError>;

    /// Atomically complete an active poll, selecting `winner`.
    ///
    /// Returns `true` when this call performed the transition and `false`
    /// when the poll was no longer active (a concurrent caller won).
    async fn complete_poll(
        &self,
        poll_id: PollId,
        winner: SlotId,
    ) -> Result<bool, PollRepositoryError>;

    /// Atomically cancel an active poll; `false` when it was not active.
    async fn cancel_poll(&self, poll_id: PollId) -> Result<bool, PollRepositoryError>;

    /// Atomically expire an active poll; `false` when it was not active.
    async fn expire_poll(&self, poll_id: PollId) -> Result<bool, PollRepositoryError>;

    /// Persist finalization references onto a completed poll.
    async fn store_finalization_refs(
        &self,
        poll_id: PollId,
        refs: &FinalizationRefs,
    ) -> Result<(), PollRepositoryError>;
}
