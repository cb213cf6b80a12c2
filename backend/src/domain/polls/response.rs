//! Availability responses.

use std::collections::HashMap;

use super::participant::ParticipantId;
use super::slot::SlotId;

/// Raw per-slot answers as submitted by a participant.
///
/// Partial maps are allowed; slots missing from the map are recorded as
/// unavailable, and unknown slot identifiers are ignored.
pub type SlotAnswers = HashMap<SlotId, bool>;

/// One participant's availability answer for one slot.
///
/// At most one row exists per `(participant, slot)` pair; resubmission
/// overwrites in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotResponse {
    /// Answering participant.
    pub participant_id: ParticipantId,
    /// Slot being answered.
    pub slot_id: SlotId,
    /// Whether the participant can attend.
    pub available: bool,
}

impl SlotResponse {
    /// Build a response row.
    pub const fn new(participant_id: ParticipantId, slot_id: SlotId, available: bool) -> Self {
        Self {
            participant_id,
            slot_id,
            available,
        }
    }
}
