//! Driving port for availability submission.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::polls::{AccessToken, PollId, SlotAnswers};

/// Outcome of one availability submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Whether this was the participant's first submission.
    pub first_submission: bool,
    /// Whether every participant of the poll has now responded.
    pub all_responded: bool,
    /// Whether the poll stands completed after this submission.
    pub poll_completed: bool,
}

/// Driving port for recording a participant's availability answers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VotingCommand: Send + Sync {
    /// Record the answers held in `answers` for the participant `token`
    /// resolves to, defaulting missing slots to unavailable and ignoring
    /// unknown slot ids.
    async fn submit_responses(
        &self,
        poll_id: PollId,
        token: &AccessToken,
        answers: SlotAnswers,
    ) -> Result<SubmissionReceipt, Error>;
}

/// Fixture implementation for handler tests that do not exercise voting.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVotingCommand;

#[async_trait]
impl VotingCommand for FixtureVotingCommand {
    async fn submit_responses(
        &self,
        _poll_id: PollId,
        _token: &AccessToken,
        _answers: SlotAnswers,
    ) -> Result<SubmissionReceipt, Error> {
        Err(Error::not_found("Poll not found"))
    }
}
