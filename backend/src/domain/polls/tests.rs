//! Tests for poll materialisation, guarded transitions, and token issuance.

use chrono::{Duration, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;

fn base_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).single().expect("valid instant")
}

fn slot_drafts(count: usize) -> Vec<SlotDraft> {
    (0..count)
        .map(|i| {
            let start = base_time() + Duration::hours(i as i64);
            SlotDraft::new(start, start + Duration::minutes(30))
        })
        .collect()
}

#[fixture]
fn draft() -> PollDraft {
    PollDraft {
        title: "Team sync".into(),
        description: Some("Weekly catch-up".into()),
        duration_minutes: Some(30),
        modality: Some(MeetingModality::Video),
        slots: slot_drafts(2),
        participants: vec![
            ParticipantDraft::new("Ada", "ada@example.com"),
            ParticipantDraft::new("Grace", "grace@example.com"),
        ],
    }
}

#[rstest]
fn materialises_active_poll_with_tokens(draft: PollDraft) {
    let created = NewPoll::try_from_draft(draft, base_time()).expect("valid draft");

    assert_eq!(created.poll.status(), PollStatus::Active);
    assert_eq!(created.poll.selected_slot_id(), None);
    assert!(created.poll.finalization().is_empty());
    assert_eq!(created.slots.len(), 2);
    assert_eq!(created.participants.len(), 2);
    for slot in &created.slots {
        assert_eq!(slot.poll_id(), created.poll.id());
        assert_eq!(slot.available_count(), 0);
        assert_eq!(slot.total_responses(), 0);
    }
    for participant in &created.participants {
        assert_eq!(participant.poll_id(), created.poll.id());
        assert!(!participant.has_responded());
        assert_eq!(participant.token().as_str().len(), 32);
    }
    // Tokens are unique across participants.
    assert_ne!(
        created.participants[0].token().as_str(),
        created.participants[1].token().as_str()
    );
}

#[rstest]
fn duration_defaults_when_absent(mut draft: PollDraft) {
    draft.duration_minutes = None;
    draft.modality = None;
    let created = NewPoll::try_from_draft(draft, base_time()).expect("valid draft");
    assert_eq!(created.poll.duration_minutes(), DEFAULT_DURATION_MINUTES);
    assert_eq!(created.poll.modality(), MeetingModality::Video);
}

#[rstest]
fn blank_description_is_dropped(mut draft: PollDraft) {
    draft.description = Some("   ".into());
    let created = NewPoll::try_from_draft(draft, base_time()).expect("valid draft");
    assert_eq!(created.poll.description(), None);
}

#[rstest]
#[case::empty_title(
    PollDraft { title: "  ".into(), ..draft() },
    PollValidationError::EmptyTitle
)]
#[case::zero_duration(
    PollDraft { duration_minutes: Some(0), ..draft() },
    PollValidationError::InvalidDuration
)]
#[case::no_slots(
    PollDraft { slots: Vec::new(), ..draft() },
    PollValidationError::NoSlots
)]
#[case::no_participants(
    PollDraft { participants: Vec::new(), ..draft() },
    PollValidationError::NoParticipants
)]
fn rejects_invalid_drafts(#[case] draft: PollDraft, #[case] expected: PollValidationError) {
    let err = NewPoll::try_from_draft(draft, base_time()).expect_err("draft is invalid");
    assert_eq!(err, expected);
}

#[rstest]
fn rejects_inverted_slot_window(mut draft: PollDraft) {
    let start = base_time();
    draft.slots = vec![SlotDraft::new(start, start - Duration::minutes(5))];
    let err = NewPoll::try_from_draft(draft, base_time()).expect_err("window is inverted");
    assert_eq!(err, PollValidationError::InvalidSlotWindow);
}

#[rstest]
fn rejects_duplicate_emails_case_insensitively(mut draft: PollDraft) {
    draft.participants = vec![
        ParticipantDraft::new("Ada", "ada@example.com"),
        ParticipantDraft::new("Other Ada", "ADA@example.com"),
    ];
    let err = NewPoll::try_from_draft(draft, base_time()).expect_err("emails collide");
    assert!(matches!(
        err,
        PollValidationError::DuplicateParticipantEmail { .. }
    ));
}

#[rstest]
#[case::missing_at("ada.example.com")]
#[case::empty_local("@example.com")]
#[case::empty_domain("ada@")]
#[case::whitespace("ada @example.com")]
fn rejects_malformed_emails(mut draft: PollDraft, #[case] email: &str) {
    draft.participants = vec![ParticipantDraft::new("Ada", email)];
    let err = NewPoll::try_from_draft(draft, base_time()).expect_err("email is malformed");
    assert!(matches!(
        err,
        PollValidationError::InvalidParticipantEmail { .. }
    ));
}

#[rstest]
fn rejects_empty_participant_name(mut draft: PollDraft) {
    draft.participants = vec![ParticipantDraft::new("  ", "ada@example.com")];
    let err = NewPoll::try_from_draft(draft, base_time()).expect_err("name is empty");
    assert_eq!(err, PollValidationError::EmptyParticipantName);
}

#[rstest]
#[case(PollStatus::Draft, "draft")]
#[case(PollStatus::Active, "active")]
#[case(PollStatus::Completed, "completed")]
#[case(PollStatus::Cancelled, "cancelled")]
#[case(PollStatus::Expired, "expired")]
fn status_spelling_round_trips(#[case] status: PollStatus, #[case] text: &str) {
    assert_eq!(status.to_string(), text);
    assert_eq!(text.parse::<PollStatus>().expect("known status"), status);
    let json = serde_json::to_string(&status).expect("serialize status");
    assert_eq!(json, format!("{text:?}"));
}

#[rstest]
fn unknown_status_is_rejected() {
    assert!("open".parse::<PollStatus>().is_err());
}

#[rstest]
#[case(MeetingModality::Video, "video", true)]
#[case(MeetingModality::InPerson, "in_person", false)]
#[case(MeetingModality::Phone, "phone", false)]
fn modality_spelling_and_video_requirement(
    #[case] modality: MeetingModality,
    #[case] text: &str,
    #[case] needs_video: bool,
) {
    assert_eq!(modality.to_string(), text);
    assert_eq!(modality.requires_video_link(), needs_video);
    let json = serde_json::to_string(&modality).expect("serialize modality");
    assert_eq!(json, format!("{text:?}"));
}

#[rstest]
fn completion_sets_winner_and_blocks_reentry(draft: PollDraft) {
    let created = NewPoll::try_from_draft(draft, base_time()).expect("valid draft");
    let mut poll = created.poll;
    let winner = created.slots[0].id();

    poll.complete(winner).expect("first completion succeeds");
    assert_eq!(poll.status(), PollStatus::Completed);
    assert_eq!(poll.selected_slot_id(), Some(winner));

    let err = poll.complete(winner).expect_err("second completion loses");
    assert_eq!(err.actual, PollStatus::Completed);
    assert!(poll.status().is_terminal());
}

#[rstest]
fn cancel_and_expire_require_active() {
    let created = NewPoll::try_from_draft(draft(), base_time()).expect("valid draft");
    let mut poll = created.poll;
    poll.cancel().expect("active poll cancels");
    assert_eq!(poll.status(), PollStatus::Cancelled);
    assert!(poll.expire().is_err());

    let other = NewPoll::try_from_draft(draft(), base_time()).expect("valid draft");
    let mut poll = other.poll;
    poll.expire().expect("active poll expires");
    assert_eq!(poll.status(), PollStatus::Expired);
    assert!(poll.cancel().is_err());
}

#[rstest]
fn finalization_refs_are_recorded(draft: PollDraft) {
    let created = NewPoll::try_from_draft(draft, base_time()).expect("valid draft");
    let mut poll = created.poll;
    poll.complete(created.slots[0].id()).expect("completes");

    poll.record_finalization(FinalizationRefs {
        video_meeting_id: Some("981234".into()),
        video_join_url: Some("https://video.example.com/j/981234".into()),
        calendar_event_id: None,
    });
    assert_eq!(
        poll.finalization().video_join_url.as_deref(),
        Some("https://video.example.com/j/981234")
    );
    assert_eq!(poll.finalization().calendar_event_id, None);
}

#[rstest]
fn participant_marks_first_and_repeat_submissions() {
    let poll_id = PollId::random();
    let mut participant =
        Participant::try_from_draft(poll_id, ParticipantDraft::new("Ada", "ada@example.com"))
            .expect("valid participant");

    let first_at = base_time();
    assert!(participant.mark_responded(first_at));
    assert!(participant.has_responded());
    assert_eq!(participant.responded_at(), Some(first_at));

    let second_at = first_at + Duration::minutes(10);
    assert!(!participant.mark_responded(second_at));
    assert_eq!(participant.responded_at(), Some(second_at));
}

#[rstest]
fn access_token_debug_is_redacted() {
    let token = AccessToken::generate();
    let debug = format!("{token:?}");
    assert!(!debug.contains(token.as_str()));
    assert_eq!(debug, "AccessToken(redacted)");
}

#[rstest]
fn voting_link_matches_access_model() {
    let poll_id = PollId::new(uuid::Uuid::nil());
    let token = AccessToken::new("tok123");
    let link = voting_link("http://localhost:8080/", poll_id, &token);
    assert_eq!(
        link,
        "http://localhost:8080/poll/00000000-0000-0000-0000-000000000000?token=tok123"
    );
}

#[rstest]
fn slot_score_uses_cached_tallies(draft: PollDraft) {
    let created = NewPoll::try_from_draft(draft, base_time()).expect("valid draft");
    let mut slot = created.slots[0].clone();
    assert_eq!(slot.score(), 0);
    slot.set_tallies(1, 2);
    assert_eq!(slot.score(), 50);
    slot.set_tallies(2, 2);
    assert_eq!(slot.score(), 100);
}
