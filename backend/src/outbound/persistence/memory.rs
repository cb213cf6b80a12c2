//! In-memory poll persistence.
//!
//! Backs the poll repository and notification ledger ports with one tokio
//! `RwLock` over plain maps. Guarded status transitions run under the write
//! lock, which is what makes `complete_poll` a compare-and-set: racing
//! completions serialise on the lock and only the first finds the poll
//! still active.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::polls::{
    AccessToken, FinalizationRefs, NewPoll, Participant, ParticipantId, Poll, PollId, SlotId,
    SlotResponse, TimeSlot,
};
use crate::domain::ports::{
    NotificationLedger, NotificationLedgerError, NotificationRecord, PollRepository,
    PollRepositoryError,
};

#[derive(Default)]
struct StoreState {
    polls: HashMap<PollId, Poll>,
    // Insertion order; list_polls reads it back to front.
    poll_order: Vec<PollId>,
    slots: HashMap<PollId, Vec<TimeSlot>>,
    participants: HashMap<PollId, Vec<Participant>>,
    participant_polls: HashMap<ParticipantId, PollId>,
    responses: HashMap<ParticipantId, HashMap<SlotId, bool>>,
    notifications: Vec<NotificationRecord>,
}

impl StoreState {
    fn recompute_tallies(&mut self, poll_id: PollId) -> Vec<TimeSlot> {
        let participant_ids: Vec<ParticipantId> = self
            .participants
            .get(&poll_id)
            .map(|participants| participants.iter().map(Participant::id).collect())
            .unwrap_or_default();

        let Some(slots) = self.slots.get_mut(&poll_id) else {
            return Vec::new();
        };
        for slot in slots.iter_mut() {
            let mut available = 0;
            let mut total = 0;
            for participant_id in &participant_ids {
                let Some(answer) = self
                    .responses
                    .get(participant_id)
                    .and_then(|answers| answers.get(&slot.id()))
                else {
                    continue;
                };
                total += 1;
                if *answer {
                    available += 1;
                }
            }
            slot.set_tallies(available, total);
        }
        slots.clone()
    }
}

/// Shared state behind the in-memory adapters.
///
/// Clone the wrapping [`Arc`] to hand the same store to the repository and
/// the ledger; the server builds one store per process.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

/// [`PollRepository`] adapter over an [`InMemoryStore`].
#[derive(Clone)]
pub struct InMemoryPollRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryPollRepository {
    /// Create a repository over the shared store.
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PollRepository for InMemoryPollRepository {
    async fn create_poll(&self, new_poll: &NewPoll) -> Result<(), PollRepositoryError> {
        let mut state = self.store.state.write().await;
        let poll_id = new_poll.poll.id();
        if state.polls.contains_key(&poll_id) {
            return Err(PollRepositoryError::query(format!(
                "poll {poll_id} already exists"
            )));
        }

        let mut slots = new_poll.slots.clone();
        slots.sort_by_key(TimeSlot::start_time);

        state.polls.insert(poll_id, new_poll.poll.clone());
        state.poll_order.push(poll_id);
        state.slots.insert(poll_id, slots);
        state
            .participants
            .insert(poll_id, new_poll.participants.clone());
        for participant in &new_poll.participants {
            state.participant_polls.insert(participant.id(), poll_id);
        }
        Ok(())
    }

    async fn find_poll(&self, poll_id: PollId) -> Result<Option<Poll>, PollRepositoryError> {
        let state = self.store.state.read().await;
        Ok(state.polls.get(&poll_id).cloned())
    }

    async fn list_polls(&self) -> Result<Vec<Poll>, PollRepositoryError> {
        let state = self.store.state.read().await;
        Ok(state
            .poll_order
            .iter()
            .rev()
            .filter_map(|poll_id| state.polls.get(poll_id).cloned())
            .collect())
    }

    async fn list_slots(&self, poll_id: PollId) -> Result<Vec<TimeSlot>, PollRepositoryError> {
        let state = self.store.state.read().await;
        Ok(state.slots.get(&poll_id).cloned().unwrap_or_default())
    }

    async fn list_participants(
        &self,
        poll_id: PollId,
    ) -> Result<Vec<Participant>, PollRepositoryError> {
        let state = self.store.state.read().await;
        Ok(state.participants.get(&poll_id).cloned().unwrap_or_default())
    }

    async fn find_participant_by_token(
        &self,
        poll_id: PollId,
        token: &AccessToken,
    ) -> Result<Option<Participant>, PollRepositoryError> {
        let state = self.store.state.read().await;
        Ok(state
            .participants
            .get(&poll_id)
            .and_then(|participants| {
                participants
                    .iter()
                    .find(|participant| participant.token() == token)
            })
            .cloned())
    }

    async fn responses_for_participant(
        &self,
        participant_id: ParticipantId,
    ) -> Result<Vec<SlotResponse>, PollRepositoryError> {
        let state = self.store.state.read().await;
        Ok(state
            .responses
            .get(&participant_id)
            .map(|answers| {
                answers
                    .iter()
                    .map(|(slot_id, available)| {
                        SlotResponse::new(participant_id, *slot_id, *available)
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn upsert_responses(
        &self,
        responses: &[SlotResponse],
    ) -> Result<(), PollRepositoryError> {
        let mut state = self.store.state.write().await;
        for response in responses {
            if !state
                .participant_polls
                .contains_key(&response.participant_id)
            {
                return Err(PollRepositoryError::query(format!(
                    "participant {} not found",
                    response.participant_id
                )));
            }
            state
                .responses
                .entry(response.participant_id)
                .or_default()
                .insert(response.slot_id, response.available);
        }
        Ok(())
    }

    async fn mark_responded(
        &self,
        participant_id: ParticipantId,
        at: DateTime<Utc>,
    ) -> Result<bool, PollRepositoryError> {
        let mut state = self.store.state.write().await;
        let Some(poll_id) = state.participant_polls.get(&participant_id).copied() else {
            return Err(PollRepositoryError::query(format!(
                "participant {participant_id} not found"
            )));
        };
        let Some(participant) = state
            .participants
            .get_mut(&poll_id)
            .and_then(|participants| {
                participants
                    .iter_mut()
                    .find(|participant| participant.id() == participant_id)
            })
        else {
            return Err(PollRepositoryError::query(format!(
                "participant {participant_id} not found"
            )));
        };
        Ok(participant.mark_responded(at))
    }

    async fn refresh_slot_tallies(
        &self,
        poll_id: PollId,
    ) -> Result<Vec<TimeSlot>, PollRepositoryError> {
        let mut state = self.store.state.write().await;
        if !state.polls.contains_key(&poll_id) {
            return Err(PollRepositoryError::query(format!(
                "poll {poll_id} not found"
            )));
        }
        Ok(state.recompute_tallies(poll_id))
    }

    async fn complete_poll(
        &self,
        poll_id: PollId,
        winner: SlotId,
    ) -> Result<bool, PollRepositoryError> {
        let mut state = self.store.state.write().await;
        let Some(poll) = state.polls.get_mut(&poll_id) else {
            return Err(PollRepositoryError::query(format!(
                "poll {poll_id} not found"
            )));
        };
        Ok(poll.complete(winner).is_ok())
    }

    async fn cancel_poll(&self, poll_id: PollId) -> Result<bool, PollRepositoryError> {
        let mut state = self.store.state.write().await;
        let Some(poll) = state.polls.get_mut(&poll_id) else {
            return Err(PollRepositoryError::query(format!(
                "poll {poll_id} not found"
            )));
        };
        Ok(poll.cancel().is_ok())
    }

    async fn expire_poll(&self, poll_id: PollId) -> Result<bool, PollRepositoryError> {
        let mut state = self.store.state.write().await;
        let Some(poll) = state.polls.get_mut(&poll_id) else {
            return Err(PollRepositoryError::query(format!(
                "poll {poll_id} not found"
            )));
        };
        Ok(poll.expire().is_ok())
    }

    async fn store_finalization_refs(
        &self,
        poll_id: PollId,
        refs: &FinalizationRefs,
    ) -> Result<(), PollRepositoryError> {
        let mut state = self.store.state.write().await;
        let Some(poll) = state.polls.get_mut(&poll_id) else {
            return Err(PollRepositoryError::query(format!(
                "poll {poll_id} not found"
            )));
        };
        poll.record_finalization(refs.clone());
        Ok(())
    }
}

/// [`NotificationLedger`] adapter over the same [`InMemoryStore`].
#[derive(Clone)]
pub struct InMemoryNotificationLedger {
    store: Arc<InMemoryStore>,
}

impl InMemoryNotificationLedger {
    /// Create a ledger over the shared store.
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NotificationLedger for InMemoryNotificationLedger {
    async fn record(&self, record: &NotificationRecord) -> Result<(), NotificationLedgerError> {
        let mut state = self.store.state.write().await;
        state.notifications.push(record.clone());
        Ok(())
    }

    async fn for_poll(
        &self,
        poll_id: PollId,
    ) -> Result<Vec<NotificationRecord>, NotificationLedgerError> {
        let state = self.store.state.read().await;
        Ok(state
            .notifications
            .iter()
            .filter(|record| record.poll_id == poll_id)
            .cloned()
            .collect())
    }
}
