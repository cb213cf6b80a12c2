//! Driving port for poll reads: coordinator overviews and participant
//! ballots.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::polls::{AccessToken, Participant, Poll, PollId, SlotAnswers, TimeSlot};

/// A poll with its slots and participants, as shown to coordinators.
#[derive(Debug, Clone)]
pub struct PollOverview {
    /// The poll record.
    pub poll: Poll,
    /// Slots ordered by start time, tallies included.
    pub slots: Vec<TimeSlot>,
    /// Participants in creation order.
    pub participants: Vec<Participant>,
}

/// The voting view for one participant.
#[derive(Debug, Clone)]
pub struct Ballot {
    /// The poll being voted on.
    pub poll: Poll,
    /// Slots ordered by start time.
    pub slots: Vec<TimeSlot>,
    /// The participant the token resolved to.
    pub participant: Participant,
    /// The participant's answers on record, keyed by slot; empty before the
    /// first submission.
    pub prior_answers: SlotAnswers,
}

/// Driving port for read-only poll access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PollQuery: Send + Sync {
    /// List every poll with slots and participants, newest poll first.
    async fn list_polls(&self) -> Result<Vec<PollOverview>, Error>;

    /// Read one poll with slots and participants.
    async fn poll_overview(&self, poll_id: PollId) -> Result<PollOverview, Error>;

    /// Resolve a ballot for the participant the token identifies.
    async fn ballot(&self, poll_id: PollId, token: &AccessToken) -> Result<Ballot, Error>;
}

/// Fixture implementation for handler tests that do not exercise reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePollQuery;

#[async_trait]
impl PollQuery for FixturePollQuery {
    async fn list_polls(&self) -> Result<Vec<PollOverview>, Error> {
        Ok(Vec::new())
    }

    async fn poll_overview(&self, _poll_id: PollId) -> Result<PollOverview, Error> {
        Err(Error::not_found("Poll not found"))
    }

    async fn ballot(&self, _poll_id: PollId, _token: &AccessToken) -> Result<Ballot, Error> {
        Err(Error::not_found("Poll not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_list_is_empty() {
        let query = FixturePollQuery;
        let polls = query.list_polls().await.expect("fixture list succeeds");
        assert!(polls.is_empty());
    }

    #[tokio::test]
    async fn fixture_ballot_reports_missing_poll() {
        let query = FixturePollQuery;
        let err = query
            .ballot(PollId::random(), &AccessToken::new("tok"))
            .await
            .expect_err("fixture has no polls");
        assert_eq!(err.code(), crate::domain::ErrorCode::NotFound);
    }
}
