//! Meeting finalization for completed polls.
//!
//! [`FinalizationCoordinator`] runs the downstream side effects once a poll
//! completes: booking a video meeting, creating a calendar event, persisting
//! the obtained references, and emailing confirmations. Every step is
//! best-effort with a per-call timeout; a failed step is logged and skipped
//! so the completed poll always stands regardless of provider health.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::domain::polls::{FinalizationRefs, Participant, Poll, PollId, TimeSlot};
use crate::domain::ports::{
    BookingProvider, CalendarProvider, ConfirmationNotice, EventRequest, FinalizationReport,
    FinalizeIntent, FinalizeMeeting, MeetingRequest, NotificationKind, NotificationLedger,
    NotificationRecord, Notifier, PollRepository,
};

/// Coordinator configuration controlling step toggles and provider patience.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizationConfig {
    /// Book a video meeting for video polls.
    pub video_booking_enabled: bool,
    /// Create a calendar event for the winning slot.
    pub calendar_enabled: bool,
    /// Email confirmations to participants.
    pub notifications_enabled: bool,
    /// Upper bound for each provider call.
    pub provider_timeout: Duration,
}

impl Default for FinalizationConfig {
    fn default() -> Self {
        Self {
            video_booking_enabled: true,
            calendar_enabled: true,
            notifications_enabled: true,
            provider_timeout: Duration::from_secs(10),
        }
    }
}

/// Driven-port bundle for [`FinalizationCoordinator`].
#[derive(Clone)]
pub struct FinalizationPorts {
    /// Repository the obtained references are persisted through.
    pub poll_repo: Arc<dyn PollRepository>,
    /// Video meeting provider.
    pub booking: Arc<dyn BookingProvider>,
    /// Calendar provider.
    pub calendar: Arc<dyn CalendarProvider>,
    /// Outbound notifier for confirmations.
    pub notifier: Arc<dyn Notifier>,
    /// Ledger recording successfully delivered confirmations.
    pub ledger: Arc<dyn NotificationLedger>,
}

/// Best-effort finalizer implementing [`FinalizeMeeting`].
pub struct FinalizationCoordinator {
    poll_repo: Arc<dyn PollRepository>,
    booking: Arc<dyn BookingProvider>,
    calendar: Arc<dyn CalendarProvider>,
    notifier: Arc<dyn Notifier>,
    ledger: Arc<dyn NotificationLedger>,
    clock: Arc<dyn Clock>,
    config: FinalizationConfig,
}

fn event_description(poll: &Poll, join_url: Option<&str>) -> String {
    let mut description = poll
        .description()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Scheduled via the \"{}\" availability poll.", poll.title()));
    if let Some(url) = join_url {
        description.push_str("\n\nJoin: ");
        description.push_str(url);
    }
    description
}

impl FinalizationCoordinator {
    /// Build a coordinator over the downstream ports.
    /// ```rust,ignore
    /// let finalizer = FinalizationCoordinator::new(ports, clock, FinalizationConfig::default());
    /// ```
    pub fn new(ports: FinalizationPorts, clock: Arc<dyn Clock>, config: FinalizationConfig) -> Self {
        Self {
            poll_repo: ports.poll_repo,
            booking: ports.booking,
            calendar: ports.calendar,
            notifier: ports.notifier,
            ledger: ports.ledger,
            clock,
            config,
        }
    }

    /// Run one provider call under the configured timeout.
    ///
    /// A failure or timeout yields `None` after logging; finalization never
    /// propagates step errors to the caller.
    async fn run_step<T, E, Fut>(&self, step: &'static str, poll_id: PollId, call: Fut) -> Option<T>
    where
        E: fmt::Display,
        Fut: Future<Output = Result<T, E>>,
    {
        match timeout(self.config.provider_timeout, call).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(error)) => {
                warn!(%poll_id, step, error = %error, "finalization step failed");
                None
            }
            Err(_) => {
                warn!(
                    %poll_id,
                    step,
                    timeout = ?self.config.provider_timeout,
                    "finalization step timed out"
                );
                None
            }
        }
    }

    async fn book_video_meeting(
        &self,
        poll: &Poll,
        slot: &TimeSlot,
        participants: &[Participant],
        refs: &mut FinalizationRefs,
    ) {
        let request = MeetingRequest {
            topic: poll.title().to_owned(),
            start_time: slot.start_time(),
            duration_minutes: poll.duration_minutes(),
            invitees: participants
                .iter()
                .map(|participant| participant.email().to_owned())
                .collect(),
        };
        if let Some(booking) = self
            .run_step(
                "video booking",
                poll.id(),
                self.booking.create_meeting(&request),
            )
            .await
        {
            refs.video_meeting_id = Some(booking.meeting_id);
            refs.video_join_url = Some(booking.join_url);
        }
    }

    async fn create_calendar_event(
        &self,
        poll: &Poll,
        slot: &TimeSlot,
        participants: &[Participant],
        refs: &mut FinalizationRefs,
    ) {
        let request = EventRequest {
            summary: poll.title().to_owned(),
            description: event_description(poll, refs.video_join_url.as_deref()),
            start_time: slot.start_time(),
            end_time: slot.end_time(),
            attendees: participants
                .iter()
                .map(|participant| participant.email().to_owned())
                .collect(),
            location: refs.video_join_url.clone(),
        };
        if let Some(event) = self
            .run_step(
                "calendar event",
                poll.id(),
                self.calendar.create_event(&request),
            )
            .await
        {
            refs.calendar_event_id = Some(event.event_id);
        }
    }

    async fn send_confirmations(
        &self,
        poll: &Poll,
        slot: &TimeSlot,
        participants: &[Participant],
        report: &mut FinalizationReport,
    ) {
        for participant in participants {
            let notice = ConfirmationNotice {
                recipient_name: participant.name().to_owned(),
                recipient_email: participant.email().to_owned(),
                poll_title: poll.title().to_owned(),
                start_time: slot.start_time(),
                duration_minutes: poll.duration_minutes(),
                join_url: report.refs.video_join_url.clone(),
            };
            let delivered = self
                .run_step(
                    "confirmation",
                    poll.id(),
                    self.notifier.send_confirmation(&notice),
                )
                .await
                .is_some();
            if !delivered {
                report.confirmations_failed += 1;
                continue;
            }
            report.confirmations_sent += 1;

            let record = NotificationRecord {
                poll_id: poll.id(),
                participant_id: participant.id(),
                kind: NotificationKind::Confirmation,
                subject: notice.subject(),
                sent_at: self.clock.utc(),
            };
            if let Err(error) = self.ledger.record(&record).await {
                warn!(
                    poll_id = %poll.id(),
                    participant_id = %participant.id(),
                    error = %error,
                    "confirmation ledger write failed"
                );
            }
        }
    }
}

#[async_trait]
impl FinalizeMeeting for FinalizationCoordinator {
    async fn finalize(&self, intent: FinalizeIntent) -> FinalizationReport {
        let FinalizeIntent {
            poll,
            slot,
            participants,
        } = intent;
        let poll_id = poll.id();
        let mut refs = FinalizationRefs::default();

        if self.config.video_booking_enabled && poll.modality().requires_video_link() {
            self.book_video_meeting(&poll, &slot, &participants, &mut refs)
                .await;
        }

        if self.config.calendar_enabled {
            self.create_calendar_event(&poll, &slot, &participants, &mut refs)
                .await;
        }

        let refs_persisted = self
            .run_step(
                "reference persistence",
                poll_id,
                self.poll_repo.store_finalization_refs(poll_id, &refs),
            )
            .await
            .is_some();

        let mut report = FinalizationReport {
            refs,
            refs_persisted,
            confirmations_sent: 0,
            confirmations_failed: 0,
        };

        if self.config.notifications_enabled {
            self.send_confirmations(&poll, &slot, &participants, &mut report)
                .await;
        }

        debug!(
            %poll_id,
            refs_persisted = report.refs_persisted,
            confirmations_sent = report.confirmations_sent,
            confirmations_failed = report.confirmations_failed,
            "finalization finished"
        );
        report
    }
}

#[cfg(test)]
#[path = "finalization_tests.rs"]
mod tests;
