//! Poll scheduling domain services.
//!
//! [`PollSchedulingService`] implements the driving ports for creating polls,
//! reading poll projections, recording availability ballots, and completing
//! polls once every participant has responded. Completion races are settled
//! by the repository's compare-and-set transition; exactly one caller wins
//! and only the winner dispatches finalization.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::warn;

use crate::domain::Error;
use crate::domain::polls::{
    AccessToken, NewPoll, Participant, Poll, PollDraft, PollId, PollStatus, SlotAnswers,
    SlotResponse, TimeSlot, voting_link,
};
use crate::domain::ports::{
    Ballot, CompletionOutcome, CompletionReport, CreatedPoll, FinalizeIntent, FinalizeMeeting,
    InviteNotice, NotificationKind, NotificationLedger, NotificationRecord, Notifier, PollCommand,
    PollOverview, PollQuery, PollRepository, PollRepositoryError, SubmissionReceipt, VotingCommand,
    VotingLink,
};
use crate::domain::scoring::select_winning_slot;

fn map_repository_error(error: PollRepositoryError) -> Error {
    match error {
        PollRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("poll repository unavailable: {message}"))
        }
        PollRepositoryError::Query { message } => {
            Error::internal(format!("poll repository error: {message}"))
        }
    }
}

/// Configuration for [`PollSchedulingService`].
#[derive(Debug, Clone)]
pub struct PollServiceConfig {
    /// Base URL voting links are minted under.
    pub voting_base_url: String,
    /// Send invite emails when a poll is created.
    pub invites_enabled: bool,
}

impl Default for PollServiceConfig {
    fn default() -> Self {
        Self {
            voting_base_url: "http://localhost:8080".to_owned(),
            invites_enabled: true,
        }
    }
}

/// Driven-port bundle for [`PollSchedulingService`].
#[derive(Clone)]
pub struct PollServicePorts {
    /// Outbound notifier used for participant invites.
    pub notifier: Arc<dyn Notifier>,
    /// Ledger recording successfully delivered notifications.
    pub ledger: Arc<dyn NotificationLedger>,
    /// Finalizer invoked once when a poll completes.
    pub finalizer: Arc<dyn FinalizeMeeting>,
}

/// Poll scheduling service implementing the poll driving ports.
#[derive(Clone)]
pub struct PollSchedulingService<R> {
    poll_repo: Arc<R>,
    notifier: Arc<dyn Notifier>,
    ledger: Arc<dyn NotificationLedger>,
    finalizer: Arc<dyn FinalizeMeeting>,
    clock: Arc<dyn Clock>,
    config: PollServiceConfig,
}

impl<R> PollSchedulingService<R> {
    /// Create a new service over the poll repository and its collaborators.
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use backend::domain::poll_service::{
    /// #     PollSchedulingService, PollServiceConfig, PollServicePorts,
    /// # };
    /// # use backend::domain::ports::{
    /// #     FixtureFinalizeMeeting, FixtureNotificationLedger, FixtureNotifier,
    /// # };
    /// # use backend::outbound::persistence::{InMemoryPollRepository, InMemoryStore};
    /// # use mockable::DefaultClock;
    /// let store = Arc::new(InMemoryStore::default());
    /// let service = PollSchedulingService::new(
    ///     Arc::new(InMemoryPollRepository::new(store)),
    ///     PollServicePorts {
    ///         notifier: Arc::new(FixtureNotifier),
    ///         ledger: Arc::new(FixtureNotificationLedger),
    ///         finalizer: Arc::new(FixtureFinalizeMeeting),
    ///     },
    ///     Arc::new(DefaultClock),
    ///     PollServiceConfig::default(),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(
        poll_repo: Arc<R>,
        ports: PollServicePorts,
        clock: Arc<dyn Clock>,
        config: PollServiceConfig,
    ) -> Self {
        Self {
            poll_repo,
            notifier: ports.notifier,
            ledger: ports.ledger,
            finalizer: ports.finalizer,
            clock,
            config,
        }
    }
}

impl<R> PollSchedulingService<R>
where
    R: PollRepository,
{
    async fn load_poll(&self, poll_id: PollId) -> Result<Poll, Error> {
        self.poll_repo
            .find_poll(poll_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("poll {poll_id} not found")))
    }

    async fn load_participant(
        &self,
        poll_id: PollId,
        token: &AccessToken,
    ) -> Result<Participant, Error> {
        self.poll_repo
            .find_participant_by_token(poll_id, token)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("poll {poll_id} has no matching ballot")))
    }

    fn build_voting_links(&self, poll_id: PollId, participants: &[Participant]) -> Vec<VotingLink> {
        participants
            .iter()
            .map(|participant| VotingLink {
                participant_id: participant.id(),
                name: participant.name().to_owned(),
                email: participant.email().to_owned(),
                url: voting_link(&self.config.voting_base_url, poll_id, participant.token()),
            })
            .collect()
    }

    /// Dispatch invite emails, one participant at a time.
    ///
    /// Delivery failures are logged and skipped so one bad address never
    /// blocks poll creation or the remaining invites.
    async fn send_invites(&self, poll: &Poll, participants: &[Participant], links: &[VotingLink]) {
        for (participant, link) in participants.iter().zip(links) {
            let notice = InviteNotice {
                recipient_name: participant.name().to_owned(),
                recipient_email: participant.email().to_owned(),
                poll_title: poll.title().to_owned(),
                voting_link: link.url.clone(),
            };
            if let Err(error) = self.notifier.send_invite(&notice).await {
                warn!(
                    poll_id = %poll.id(),
                    participant_id = %participant.id(),
                    error = %error,
                    "invite delivery failed"
                );
                continue;
            }
            let record = NotificationRecord {
                poll_id: poll.id(),
                participant_id: participant.id(),
                kind: NotificationKind::Invite,
                subject: notice.subject(),
                sent_at: self.clock.utc(),
            };
            if let Err(error) = self.ledger.record(&record).await {
                warn!(
                    poll_id = %poll.id(),
                    participant_id = %participant.id(),
                    error = %error,
                    "invite ledger write failed"
                );
            }
        }
    }

    /// Complete the poll if every participant has responded.
    ///
    /// The repository transition is a compare-and-set on the active status,
    /// so when concurrent submissions race here exactly one caller observes
    /// [`CompletionOutcome::Completed`] and dispatches finalization.
    async fn complete_if_ready(
        &self,
        poll: &Poll,
        slots: &[TimeSlot],
        participants: &[Participant],
    ) -> Result<CompletionOutcome, Error> {
        if participants.is_empty() || !participants.iter().all(Participant::has_responded) {
            return Ok(CompletionOutcome::NotReady);
        }
        let Some(winner) = select_winning_slot(slots) else {
            return Ok(CompletionOutcome::NotReady);
        };

        let won = self
            .poll_repo
            .complete_poll(poll.id(), winner.id())
            .await
            .map_err(map_repository_error)?;
        if !won {
            return Ok(CompletionOutcome::AlreadyCompleted);
        }

        let completed = self.load_poll(poll.id()).await?;
        self.finalizer
            .finalize(FinalizeIntent {
                poll: completed,
                slot: winner.clone(),
                participants: participants.to_vec(),
            })
            .await;
        Ok(CompletionOutcome::Completed)
    }
}

#[async_trait]
impl<R> PollCommand for PollSchedulingService<R>
where
    R: PollRepository,
{
    async fn create_poll(&self, draft: PollDraft) -> Result<CreatedPoll, Error> {
        let new_poll = NewPoll::try_from_draft(draft, self.clock.utc())
            .map_err(|err| Error::invalid_request(format!("invalid poll draft: {err}")))?;

        self.poll_repo
            .create_poll(&new_poll)
            .await
            .map_err(map_repository_error)?;

        let NewPoll {
            poll,
            slots,
            participants,
        } = new_poll;
        let voting_links = self.build_voting_links(poll.id(), &participants);

        if self.config.invites_enabled {
            self.send_invites(&poll, &participants, &voting_links).await;
        }

        Ok(CreatedPoll {
            poll,
            slots,
            participants,
            voting_links,
        })
    }

    async fn cancel_poll(&self, poll_id: PollId) -> Result<Poll, Error> {
        self.load_poll(poll_id).await?;

        let done = self
            .poll_repo
            .cancel_poll(poll_id)
            .await
            .map_err(map_repository_error)?;
        if !done {
            let current = self.load_poll(poll_id).await?;
            return Err(Error::conflict(format!(
                "poll {poll_id} is {}, cancellation requires an active poll",
                current.status()
            )));
        }

        self.load_poll(poll_id).await
    }

    async fn expire_poll(&self, poll_id: PollId) -> Result<Poll, Error> {
        self.load_poll(poll_id).await?;

        let done = self
            .poll_repo
            .expire_poll(poll_id)
            .await
            .map_err(map_repository_error)?;
        if !done {
            let current = self.load_poll(poll_id).await?;
            return Err(Error::conflict(format!(
                "poll {poll_id} is {}, expiry requires an active poll",
                current.status()
            )));
        }

        self.load_poll(poll_id).await
    }

    async fn complete_poll(&self, poll_id: PollId) -> Result<CompletionReport, Error> {
        let poll = self.load_poll(poll_id).await?;
        match poll.status() {
            PollStatus::Active => {}
            PollStatus::Completed => {
                return Ok(CompletionReport {
                    outcome: CompletionOutcome::AlreadyCompleted,
                    poll,
                });
            }
            status => {
                return Err(Error::conflict(format!(
                    "poll {poll_id} is {status}, completion requires an active poll"
                )));
            }
        }

        let slots = self
            .poll_repo
            .refresh_slot_tallies(poll_id)
            .await
            .map_err(map_repository_error)?;
        let participants = self
            .poll_repo
            .list_participants(poll_id)
            .await
            .map_err(map_repository_error)?;

        let outcome = self.complete_if_ready(&poll, &slots, &participants).await?;
        let poll = match outcome {
            CompletionOutcome::NotReady => poll,
            _ => self.load_poll(poll_id).await?,
        };
        Ok(CompletionReport { outcome, poll })
    }
}

#[async_trait]
impl<R> PollQuery for PollSchedulingService<R>
where
    R: PollRepository,
{
    async fn list_polls(&self) -> Result<Vec<PollOverview>, Error> {
        let polls = self
            .poll_repo
            .list_polls()
            .await
            .map_err(map_repository_error)?;

        let mut overviews = Vec::with_capacity(polls.len());
        for poll in polls {
            let slots = self
                .poll_repo
                .list_slots(poll.id())
                .await
                .map_err(map_repository_error)?;
            let participants = self
                .poll_repo
                .list_participants(poll.id())
                .await
                .map_err(map_repository_error)?;
            overviews.push(PollOverview {
                poll,
                slots,
                participants,
            });
        }
        Ok(overviews)
    }

    async fn poll_overview(&self, poll_id: PollId) -> Result<PollOverview, Error> {
        let poll = self.load_poll(poll_id).await?;
        let slots = self
            .poll_repo
            .list_slots(poll_id)
            .await
            .map_err(map_repository_error)?;
        let participants = self
            .poll_repo
            .list_participants(poll_id)
            .await
            .map_err(map_repository_error)?;
        Ok(PollOverview {
            poll,
            slots,
            participants,
        })
    }

    async fn ballot(&self, poll_id: PollId, token: &AccessToken) -> Result<Ballot, Error> {
        let poll = self.load_poll(poll_id).await?;
        let participant = self.load_participant(poll_id, token).await?;
        let slots = self
            .poll_repo
            .list_slots(poll_id)
            .await
            .map_err(map_repository_error)?;
        let prior_answers: SlotAnswers = self
            .poll_repo
            .responses_for_participant(participant.id())
            .await
            .map_err(map_repository_error)?
            .into_iter()
            .map(|row| (row.slot_id, row.available))
            .collect();
        Ok(Ballot {
            poll,
            slots,
            participant,
            prior_answers,
        })
    }
}

#[async_trait]
impl<R> VotingCommand for PollSchedulingService<R>
where
    R: PollRepository,
{
    async fn submit_responses(
        &self,
        poll_id: PollId,
        token: &AccessToken,
        answers: SlotAnswers,
    ) -> Result<SubmissionReceipt, Error> {
        let poll = self.load_poll(poll_id).await?;
        let participant = self.load_participant(poll_id, token).await?;
        if poll.status() != PollStatus::Active {
            return Err(Error::conflict(format!(
                "poll {poll_id} is {}, voting is closed",
                poll.status()
            )));
        }

        // One row per poll slot: absent answers default to unavailable and
        // answers for foreign slot ids never reach the store.
        let slots = self
            .poll_repo
            .list_slots(poll_id)
            .await
            .map_err(map_repository_error)?;
        let responses: Vec<SlotResponse> = slots
            .iter()
            .map(|slot| {
                let available = answers.get(&slot.id()).copied().unwrap_or(false);
                SlotResponse::new(participant.id(), slot.id(), available)
            })
            .collect();

        self.poll_repo
            .upsert_responses(&responses)
            .await
            .map_err(map_repository_error)?;
        let first_submission = self
            .poll_repo
            .mark_responded(participant.id(), self.clock.utc())
            .await
            .map_err(map_repository_error)?;

        let slots = self
            .poll_repo
            .refresh_slot_tallies(poll_id)
            .await
            .map_err(map_repository_error)?;
        let participants = self
            .poll_repo
            .list_participants(poll_id)
            .await
            .map_err(map_repository_error)?;
        let all_responded =
            !participants.is_empty() && participants.iter().all(Participant::has_responded);

        let poll_completed = if all_responded {
            let outcome = self.complete_if_ready(&poll, &slots, &participants).await?;
            matches!(
                outcome,
                CompletionOutcome::Completed | CompletionOutcome::AlreadyCompleted
            )
        } else {
            false
        };

        Ok(SubmissionReceipt {
            first_submission,
            all_responded,
            poll_completed,
        })
    }
}

#[cfg(test)]
#[path = "poll_service_tests.rs"]
mod tests;
