//! Driving port for meeting finalization.
//!
//! The scheduling service emits exactly one intent per completed poll; the
//! implementation performs the downstream side effects and never fails the
//! caller, reporting what it achieved instead.

use async_trait::async_trait;

use crate::domain::polls::{FinalizationRefs, Participant, Poll, TimeSlot};

/// Everything finalization needs about a freshly completed poll.
#[derive(Debug, Clone)]
pub struct FinalizeIntent {
    /// The completed poll.
    pub poll: Poll,
    /// The winning slot.
    pub slot: TimeSlot,
    /// Every participant of the poll.
    pub participants: Vec<Participant>,
}

/// What finalization achieved, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalizationReport {
    /// References obtained from providers; partial results are normal.
    pub refs: FinalizationRefs,
    /// Whether the references were persisted onto the poll.
    pub refs_persisted: bool,
    /// Confirmations the delivery service accepted.
    pub confirmations_sent: u32,
    /// Confirmations that failed; the failures are logged, not retried.
    pub confirmations_failed: u32,
}

/// Driving port consuming finalize intents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FinalizeMeeting: Send + Sync {
    /// Execute the best-effort finalization steps for `intent`.
    async fn finalize(&self, intent: FinalizeIntent) -> FinalizationReport;
}

/// Fixture implementation that performs no side effects.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFinalizeMeeting;

#[async_trait]
impl FinalizeMeeting for FixtureFinalizeMeeting {
    async fn finalize(&self, _intent: FinalizeIntent) -> FinalizationReport {
        FinalizationReport::default()
    }
}
