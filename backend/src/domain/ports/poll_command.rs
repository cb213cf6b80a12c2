//! Driving port for poll administration: creation and lifecycle operations.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::polls::{
    NewPoll, Participant, ParticipantId, Poll, PollDraft, PollId, TimeSlot,
};

/// A participant's personal voting link, returned to the coordinator at
/// creation so invites can be forwarded manually if need be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingLink {
    /// Participant the link belongs to.
    pub participant_id: ParticipantId,
    /// Participant display name.
    pub name: String,
    /// Participant email address.
    pub email: String,
    /// Capability URL granting access to the ballot.
    pub url: String,
}

/// Result of a successful poll creation.
#[derive(Debug, Clone)]
pub struct CreatedPoll {
    /// The persisted poll, already active.
    pub poll: Poll,
    /// Candidate slots ordered as submitted.
    pub slots: Vec<TimeSlot>,
    /// Participants with their issued tokens.
    pub participants: Vec<Participant>,
    /// One voting link per participant.
    pub voting_links: Vec<VotingLink>,
}

/// How a manual completion request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// This call performed the completion transition.
    Completed,
    /// The poll had already completed; nothing changed.
    AlreadyCompleted,
    /// Not every participant has responded yet; nothing changed.
    NotReady,
}

/// Result of a manual completion request.
#[derive(Debug, Clone)]
pub struct CompletionReport {
    /// What the call did.
    pub outcome: CompletionOutcome,
    /// The poll as it stands after the call.
    pub poll: Poll,
}

/// Driving port for coordinator-facing poll operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PollCommand: Send + Sync {
    /// Validate and persist a new poll; dispatch invites best-effort.
    async fn create_poll(&self, draft: PollDraft) -> Result<CreatedPoll, Error>;

    /// Cancel an active poll.
    async fn cancel_poll(&self, poll_id: PollId) -> Result<Poll, Error>;

    /// Expire an active poll.
    async fn expire_poll(&self, poll_id: PollId) -> Result<Poll, Error>;

    /// Evaluate completion now: if every participant has responded and the
    /// poll is still active, select the winner and finalize.
    async fn complete_poll(&self, poll_id: PollId) -> Result<CompletionReport, Error>;
}

/// Fixture implementation for handler tests that do not exercise polls.
///
/// `create_poll` materialises the draft without persisting or notifying;
/// id-based operations report the poll as missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePollCommand;

#[async_trait]
impl PollCommand for FixturePollCommand {
    async fn create_poll(&self, draft: PollDraft) -> Result<CreatedPoll, Error> {
        let created = NewPoll::try_from_draft(draft, chrono::Utc::now())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let voting_links = created
            .participants
            .iter()
            .map(|participant| VotingLink {
                participant_id: participant.id(),
                name: participant.name().to_owned(),
                email: participant.email().to_owned(),
                url: crate::domain::polls::voting_link(
                    "http://localhost:8080",
                    created.poll.id(),
                    participant.token(),
                ),
            })
            .collect();
        Ok(CreatedPoll {
            poll: created.poll,
            slots: created.slots,
            participants: created.participants,
            voting_links,
        })
    }

    async fn cancel_poll(&self, _poll_id: PollId) -> Result<Poll, Error> {
        Err(Error::not_found("Poll not found"))
    }

    async fn expire_poll(&self, _poll_id: PollId) -> Result<Poll, Error> {
        Err(Error::not_found("Poll not found"))
    }

    async fn complete_poll(&self, _poll_id: PollId) -> Result<CompletionReport, Error> {
        Err(Error::not_found("Poll not found"))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::polls::{ParticipantDraft, SlotDraft};

    fn draft() -> PollDraft {
        let start = Utc::now();
        PollDraft {
            title: "Team sync".into(),
            description: None,
            duration_minutes: None,
            modality: None,
            slots: vec![SlotDraft::new(start, start + Duration::minutes(30))],
            participants: vec![ParticipantDraft::new("Ada", "ada@example.com")],
        }
    }

    #[tokio::test]
    async fn fixture_create_materialises_links() {
        let command = FixturePollCommand;
        let created = command
            .create_poll(draft())
            .await
            .expect("fixture create succeeds");
        assert_eq!(created.voting_links.len(), 1);
        assert!(created.voting_links[0].url.contains("token="));
    }

    #[tokio::test]
    async fn fixture_create_rejects_invalid_drafts() {
        let command = FixturePollCommand;
        let mut bad = draft();
        bad.title = "  ".into();
        let err = command
            .create_poll(bad)
            .await
            .expect_err("fixture rejects empty titles");
        assert_eq!(err.code(), crate::domain::ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_cancel_reports_missing_poll() {
        let command = FixturePollCommand;
        let err = command
            .cancel_poll(PollId::random())
            .await
            .expect_err("fixture has no polls");
        assert_eq!(err.code(), crate::domain::ErrorCode::NotFound);
    }
}
