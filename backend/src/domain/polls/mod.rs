//! Scheduling poll aggregate: polls, candidate slots, participants, and
//! their availability responses.

mod participant;
mod poll;
mod response;
mod slot;
mod suggestions;

pub use participant::{AccessToken, Participant, ParticipantDraft, ParticipantId, voting_link};
pub use poll::{
    DEFAULT_DURATION_MINUTES, FinalizationRefs, InvalidTransition, MeetingModality, NewPoll, Poll,
    PollDraft, PollId, PollStatus, PollValidationError, UnknownStatus,
};
pub use response::{SlotAnswers, SlotResponse};
pub use slot::{SlotDraft, SlotId, TimeSlot};
pub use suggestions::{PREFERRED_HOURS, suggest_slots};

#[cfg(test)]
mod tests;
