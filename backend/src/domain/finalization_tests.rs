//! Tests for the finalization coordinator.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use mockable::DefaultClock;

use super::*;
use crate::domain::polls::{
    MeetingModality, NewPoll, ParticipantDraft, PollDraft, PollStatus, SlotDraft,
};
use crate::domain::ports::{
    BookingProviderError, CalendarEventRef, CalendarProviderError, MeetingBooking,
    MockBookingProvider, MockCalendarProvider, MockNotificationLedger, MockNotifier,
    MockPollRepository, NotifierError, PollRepositoryError,
};

fn intent(modality: Option<MeetingModality>) -> FinalizeIntent {
    let start = Utc::now();
    let created = NewPoll::try_from_draft(
        PollDraft {
            title: "Design review".into(),
            description: None,
            duration_minutes: Some(30),
            modality,
            slots: vec![SlotDraft::new(start, start + ChronoDuration::minutes(30))],
            participants: vec![
                ParticipantDraft::new("Alice", "alice@example.com"),
                ParticipantDraft::new("Bob", "bob@example.com"),
            ],
        },
        start,
    )
    .expect("valid draft");

    let NewPoll {
        mut poll,
        slots,
        participants,
    } = created;
    let winner = slots[0].clone();
    poll.complete(winner.id()).expect("poll is active");
    assert_eq!(poll.status(), PollStatus::Completed);
    FinalizeIntent {
        poll,
        slot: winner,
        participants,
    }
}

fn coordinator(
    repo: MockPollRepository,
    booking: MockBookingProvider,
    calendar: MockCalendarProvider,
    notifier: MockNotifier,
    ledger: MockNotificationLedger,
    config: FinalizationConfig,
) -> FinalizationCoordinator {
    FinalizationCoordinator::new(
        FinalizationPorts {
            poll_repo: Arc::new(repo),
            booking: Arc::new(booking),
            calendar: Arc::new(calendar),
            notifier: Arc::new(notifier),
            ledger: Arc::new(ledger),
        },
        Arc::new(DefaultClock),
        config,
    )
}

#[tokio::test]
async fn finalizes_video_poll_end_to_end() {
    let intent = intent(None);

    let mut booking = MockBookingProvider::new();
    booking.expect_create_meeting().times(1).return_once(|_| {
        Ok(MeetingBooking {
            meeting_id: "meeting-1".to_owned(),
            join_url: "https://video.example/j/1".to_owned(),
        })
    });

    let mut calendar = MockCalendarProvider::new();
    calendar
        .expect_create_event()
        .times(1)
        .withf(|request| {
            request.location.as_deref() == Some("https://video.example/j/1")
                && request.description.contains("https://video.example/j/1")
                && request.attendees.len() == 2
        })
        .return_once(|_| {
            Ok(CalendarEventRef {
                event_id: "event-1".to_owned(),
            })
        });

    let mut repo = MockPollRepository::new();
    repo.expect_store_finalization_refs()
        .times(1)
        .withf(|_, refs| {
            refs.video_meeting_id.as_deref() == Some("meeting-1")
                && refs.calendar_event_id.as_deref() == Some("event-1")
        })
        .return_once(|_, _| Ok(()));

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_confirmation()
        .times(2)
        .withf(|notice| notice.join_url.as_deref() == Some("https://video.example/j/1"))
        .returning(|_| Ok(()));
    let mut ledger = MockNotificationLedger::new();
    ledger
        .expect_record()
        .times(2)
        .withf(|record| {
            record.kind == NotificationKind::Confirmation
                && record.subject == "Confirmed: Design review"
        })
        .returning(|_| Ok(()));

    let report = coordinator(
        repo,
        booking,
        calendar,
        notifier,
        ledger,
        FinalizationConfig::default(),
    )
    .finalize(intent)
    .await;

    assert!(report.refs_persisted);
    assert_eq!(report.refs.video_join_url.as_deref(), Some("https://video.example/j/1"));
    assert_eq!(report.refs.calendar_event_id.as_deref(), Some("event-1"));
    assert_eq!(report.confirmations_sent, 2);
    assert_eq!(report.confirmations_failed, 0);
}

#[tokio::test]
async fn booking_failure_still_creates_event_and_confirms() {
    let intent = intent(None);

    let mut booking = MockBookingProvider::new();
    booking
        .expect_create_meeting()
        .times(1)
        .return_once(|_| Err(BookingProviderError::status(429, "rate limited")));

    let mut calendar = MockCalendarProvider::new();
    calendar
        .expect_create_event()
        .times(1)
        .withf(|request| request.location.is_none())
        .return_once(|_| {
            Ok(CalendarEventRef {
                event_id: "event-1".to_owned(),
            })
        });

    let mut repo = MockPollRepository::new();
    repo.expect_store_finalization_refs()
        .times(1)
        .withf(|_, refs| {
            refs.video_meeting_id.is_none() && refs.calendar_event_id.as_deref() == Some("event-1")
        })
        .return_once(|_, _| Ok(()));

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_confirmation()
        .times(2)
        .withf(|notice| notice.join_url.is_none())
        .returning(|_| Ok(()));
    let mut ledger = MockNotificationLedger::new();
    ledger.expect_record().times(2).returning(|_| Ok(()));

    let report = coordinator(
        repo,
        booking,
        calendar,
        notifier,
        ledger,
        FinalizationConfig::default(),
    )
    .finalize(intent)
    .await;

    assert!(report.refs_persisted);
    assert!(report.refs.video_meeting_id.is_none());
    assert_eq!(report.confirmations_sent, 2);
}

#[tokio::test]
async fn in_person_poll_never_books_video() {
    let intent = intent(Some(MeetingModality::InPerson));

    let mut booking = MockBookingProvider::new();
    booking.expect_create_meeting().times(0);

    let mut calendar = MockCalendarProvider::new();
    calendar.expect_create_event().times(1).return_once(|_| {
        Ok(CalendarEventRef {
            event_id: "event-1".to_owned(),
        })
    });

    let mut repo = MockPollRepository::new();
    repo.expect_store_finalization_refs()
        .times(1)
        .return_once(|_, _| Ok(()));

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_confirmation()
        .times(2)
        .returning(|_| Ok(()));
    let mut ledger = MockNotificationLedger::new();
    ledger.expect_record().times(2).returning(|_| Ok(()));

    let report = coordinator(
        repo,
        booking,
        calendar,
        notifier,
        ledger,
        FinalizationConfig::default(),
    )
    .finalize(intent)
    .await;

    assert!(report.refs.video_meeting_id.is_none());
    assert!(report.refs.video_join_url.is_none());
}

#[tokio::test]
async fn confirmation_failures_are_isolated() {
    let intent = intent(Some(MeetingModality::Phone));

    let booking = MockBookingProvider::new();

    let mut calendar = MockCalendarProvider::new();
    calendar
        .expect_create_event()
        .times(1)
        .return_once(|_| Err(CalendarProviderError::transport("dns failure")));

    let mut repo = MockPollRepository::new();
    repo.expect_store_finalization_refs()
        .times(1)
        .return_once(|_, _| Ok(()));

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_confirmation()
        .times(1)
        .return_once(|_| Err(NotifierError::status(550, "mailbox unavailable")));
    notifier
        .expect_send_confirmation()
        .times(1)
        .return_once(|_| Ok(()));
    let mut ledger = MockNotificationLedger::new();
    ledger.expect_record().times(1).returning(|_| Ok(()));

    let report = coordinator(
        repo,
        booking,
        calendar,
        notifier,
        ledger,
        FinalizationConfig::default(),
    )
    .finalize(intent)
    .await;

    assert_eq!(report.confirmations_sent, 1);
    assert_eq!(report.confirmations_failed, 1);
    assert!(report.refs.calendar_event_id.is_none());
}

#[tokio::test]
async fn disabled_steps_only_persist_empty_refs() {
    let intent = intent(None);

    let mut booking = MockBookingProvider::new();
    booking.expect_create_meeting().times(0);
    let mut calendar = MockCalendarProvider::new();
    calendar.expect_create_event().times(0);
    let mut notifier = MockNotifier::new();
    notifier.expect_send_confirmation().times(0);
    let ledger = MockNotificationLedger::new();

    let mut repo = MockPollRepository::new();
    repo.expect_store_finalization_refs()
        .times(1)
        .withf(|_, refs| refs.is_empty())
        .return_once(|_, _| Ok(()));

    let config = FinalizationConfig {
        video_booking_enabled: false,
        calendar_enabled: false,
        notifications_enabled: false,
        ..FinalizationConfig::default()
    };
    let report = coordinator(repo, booking, calendar, notifier, ledger, config)
        .finalize(intent)
        .await;

    assert!(report.refs.is_empty());
    assert!(report.refs_persisted);
    assert_eq!(report.confirmations_sent, 0);
}

#[tokio::test]
async fn stalled_provider_is_timed_out() {
    struct StallingBooking;

    #[async_trait]
    impl BookingProvider for StallingBooking {
        async fn create_meeting(
            &self,
            _request: &MeetingRequest,
        ) -> Result<MeetingBooking, BookingProviderError> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(MeetingBooking {
                meeting_id: "late".to_owned(),
                join_url: "late".to_owned(),
            })
        }
    }

    let intent = intent(None);

    let mut repo = MockPollRepository::new();
    repo.expect_store_finalization_refs()
        .times(1)
        .withf(|_, refs| refs.is_empty())
        .return_once(|_, _| Ok(()));

    let config = FinalizationConfig {
        calendar_enabled: false,
        notifications_enabled: false,
        provider_timeout: Duration::from_millis(25),
        ..FinalizationConfig::default()
    };
    let finalizer = FinalizationCoordinator::new(
        FinalizationPorts {
            poll_repo: Arc::new(repo),
            booking: Arc::new(StallingBooking),
            calendar: Arc::new(MockCalendarProvider::new()),
            notifier: Arc::new(MockNotifier::new()),
            ledger: Arc::new(MockNotificationLedger::new()),
        },
        Arc::new(DefaultClock),
        config,
    );

    let report = finalizer.finalize(intent).await;

    assert!(report.refs.video_meeting_id.is_none());
    assert!(report.refs_persisted);
}

#[tokio::test]
async fn persistence_failure_still_sends_confirmations() {
    let intent = intent(Some(MeetingModality::InPerson));

    let booking = MockBookingProvider::new();
    let mut calendar = MockCalendarProvider::new();
    calendar.expect_create_event().times(1).return_once(|_| {
        Ok(CalendarEventRef {
            event_id: "event-1".to_owned(),
        })
    });

    let mut repo = MockPollRepository::new();
    repo.expect_store_finalization_refs()
        .times(1)
        .return_once(|_, _| Err(PollRepositoryError::query("row vanished")));

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_confirmation()
        .times(2)
        .returning(|_| Ok(()));
    let mut ledger = MockNotificationLedger::new();
    ledger.expect_record().times(2).returning(|_| Ok(()));

    let report = coordinator(
        repo,
        booking,
        calendar,
        notifier,
        ledger,
        FinalizationConfig::default(),
    )
    .finalize(intent)
    .await;

    assert!(!report.refs_persisted);
    assert_eq!(report.refs.calendar_event_id.as_deref(), Some("event-1"));
    assert_eq!(report.confirmations_sent, 2);
}
