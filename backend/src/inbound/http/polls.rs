//! Poll administration HTTP handlers.
//!
//! ```text
//! POST /api/v1/polls
//! GET  /api/v1/polls
//! GET  /api/v1/polls/{poll_id}
//! POST /api/v1/polls/{poll_id}/cancel
//! POST /api/v1/polls/{poll_id}/expire
//! POST /api/v1/polls/{poll_id}/complete
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::polls::FinalizationRefs;
use crate::domain::ports::{
    CompletionOutcome, CompletionReport, CreatedPoll, PollOverview, VotingLink,
};
use crate::domain::{
    ApiResult, Error, MeetingModality, Participant, ParticipantDraft, Poll, PollDraft, PollId,
    SlotDraft, TimeSlot,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_rfc3339_timestamp_at, parse_uuid};

/// Request payload for creating a poll.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequestBody {
    pub title: String,
    pub description: Option<String>,
    /// Meeting length in minutes; defaults to 30 when omitted.
    pub duration_minutes: Option<u32>,
    /// `video`, `in_person`, or `phone`; defaults to `video` when omitted.
    pub modality: Option<String>,
    pub time_slots: Vec<TimeSlotRequestBody>,
    pub participants: Vec<ParticipantRequestBody>,
}

/// Candidate time window payload.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotRequestBody {
    #[schema(format = "date-time")]
    pub start_time: String,
    #[schema(format = "date-time")]
    pub end_time: String,
}

/// Invitee payload.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRequestBody {
    pub name: String,
    pub email: String,
}

/// Poll details shared by every poll-bearing response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PollBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: u32,
    pub modality: String,
    pub status: String,
    #[schema(format = "uuid")]
    pub selected_slot_id: Option<String>,
    pub finalization: FinalizationRefsBody,
    #[schema(format = "date-time")]
    pub created_at: String,
}

/// External references captured when the meeting was finalized.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalizationRefsBody {
    pub video_meeting_id: Option<String>,
    pub video_join_url: Option<String>,
    pub calendar_event_id: Option<String>,
}

/// Candidate time window with its current tallies.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "date-time")]
    pub start_time: String,
    #[schema(format = "date-time")]
    pub end_time: String,
    pub available_count: u32,
    pub total_responses: u32,
    /// Desirability score in `[0, 100]`.
    pub score: u8,
}

/// Invitee as shown to coordinators; voting tokens are never included.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub has_responded: bool,
    #[schema(format = "date-time")]
    pub responded_at: Option<String>,
}

/// One participant's personal voting link.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VotingLinkBody {
    #[schema(format = "uuid")]
    pub participant_id: String,
    pub name: String,
    pub email: String,
    pub url: String,
}

/// Response payload for poll creation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollResponseBody {
    pub poll: PollBody,
    pub slots: Vec<SlotBody>,
    pub participants: Vec<ParticipantBody>,
    pub voting_links: Vec<VotingLinkBody>,
}

/// One poll with its slots and participants.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PollOverviewBody {
    pub poll: PollBody,
    pub slots: Vec<SlotBody>,
    pub participants: Vec<ParticipantBody>,
}

/// Response payload for the poll listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PollListResponseBody {
    pub polls: Vec<PollOverviewBody>,
}

/// Response payload for a manual completion request.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponseBody {
    /// `completed`, `already_completed`, or `not_ready`.
    pub outcome: String,
    pub poll: PollBody,
}

impl From<&FinalizationRefs> for FinalizationRefsBody {
    fn from(refs: &FinalizationRefs) -> Self {
        Self {
            video_meeting_id: refs.video_meeting_id.clone(),
            video_join_url: refs.video_join_url.clone(),
            calendar_event_id: refs.calendar_event_id.clone(),
        }
    }
}

impl From<&Poll> for PollBody {
    fn from(poll: &Poll) -> Self {
        Self {
            id: poll.id().to_string(),
            title: poll.title().to_owned(),
            description: poll.description().map(str::to_owned),
            duration_minutes: poll.duration_minutes(),
            modality: poll.modality().to_string(),
            status: poll.status().to_string(),
            selected_slot_id: poll.selected_slot_id().map(|id| id.to_string()),
            finalization: FinalizationRefsBody::from(poll.finalization()),
            created_at: poll.created_at().to_rfc3339(),
        }
    }
}

impl From<&TimeSlot> for SlotBody {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            id: slot.id().to_string(),
            start_time: slot.start_time().to_rfc3339(),
            end_time: slot.end_time().to_rfc3339(),
            available_count: slot.available_count(),
            total_responses: slot.total_responses(),
            score: slot.score(),
        }
    }
}

impl From<&Participant> for ParticipantBody {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.id().to_string(),
            name: participant.name().to_owned(),
            email: participant.email().to_owned(),
            has_responded: participant.has_responded(),
            responded_at: participant.responded_at().map(|at| at.to_rfc3339()),
        }
    }
}

impl From<VotingLink> for VotingLinkBody {
    fn from(link: VotingLink) -> Self {
        Self {
            participant_id: link.participant_id.to_string(),
            name: link.name,
            email: link.email,
            url: link.url,
        }
    }
}

impl From<CreatedPoll> for CreatePollResponseBody {
    fn from(created: CreatedPoll) -> Self {
        Self {
            poll: PollBody::from(&created.poll),
            slots: created.slots.iter().map(SlotBody::from).collect(),
            participants: created
                .participants
                .iter()
                .map(ParticipantBody::from)
                .collect(),
            voting_links: created
                .voting_links
                .into_iter()
                .map(VotingLinkBody::from)
                .collect(),
        }
    }
}

impl From<PollOverview> for PollOverviewBody {
    fn from(overview: PollOverview) -> Self {
        Self {
            poll: PollBody::from(&overview.poll),
            slots: overview.slots.iter().map(SlotBody::from).collect(),
            participants: overview
                .participants
                .iter()
                .map(ParticipantBody::from)
                .collect(),
        }
    }
}

impl From<CompletionReport> for CompletionResponseBody {
    fn from(report: CompletionReport) -> Self {
        Self {
            outcome: outcome_label(report.outcome).to_owned(),
            poll: PollBody::from(&report.poll),
        }
    }
}

const fn outcome_label(outcome: CompletionOutcome) -> &'static str {
    match outcome {
        CompletionOutcome::Completed => "completed",
        CompletionOutcome::AlreadyCompleted => "already_completed",
        CompletionOutcome::NotReady => "not_ready",
    }
}

fn parse_modality(value: Option<String>) -> Result<Option<MeetingModality>, Error> {
    let Some(raw) = value else {
        return Ok(None);
    };
    match raw.as_str() {
        "video" => Ok(Some(MeetingModality::Video)),
        "in_person" => Ok(Some(MeetingModality::InPerson)),
        "phone" => Ok(Some(MeetingModality::Phone)),
        _ => Err(
            Error::invalid_request("modality must be video, in_person, or phone").with_details(
                json!({
                    "field": "modality",
                    "value": raw,
                    "code": "invalid_modality",
                }),
            ),
        ),
    }
}

fn parse_slots(slots: Vec<TimeSlotRequestBody>) -> Result<Vec<SlotDraft>, Error> {
    let mut parsed = Vec::with_capacity(slots.len());
    for (index, slot) in slots.into_iter().enumerate() {
        let start_time =
            parse_rfc3339_timestamp_at(slot.start_time, FieldName::new("startTime"), index)?;
        let end_time =
            parse_rfc3339_timestamp_at(slot.end_time, FieldName::new("endTime"), index)?;
        parsed.push(SlotDraft::new(start_time, end_time));
    }
    Ok(parsed)
}

fn parse_poll_draft(payload: CreatePollRequestBody) -> Result<PollDraft, Error> {
    Ok(PollDraft {
        title: payload.title,
        description: payload.description,
        duration_minutes: payload.duration_minutes,
        modality: parse_modality(payload.modality)?,
        slots: parse_slots(payload.time_slots)?,
        participants: payload
            .participants
            .into_iter()
            .map(|participant| ParticipantDraft::new(participant.name, participant.email))
            .collect(),
    })
}

pub(crate) fn parse_poll_id(raw: String) -> Result<PollId, Error> {
    parse_uuid(raw, FieldName::new("pollId")).map(PollId::new)
}

/// Create a poll and dispatch invites.
///
/// # Examples
/// ```no_run
/// use actix_web::web;
/// use backend::domain::ApiResult;
/// use backend::inbound::http::polls::{
///     CreatePollRequestBody, ParticipantRequestBody, TimeSlotRequestBody, create_poll,
/// };
/// use backend::inbound::http::state::HttpState;
///
/// async fn call_handler(state: web::Data<HttpState>) -> ApiResult<actix_web::HttpResponse> {
///     let payload = web::Json(CreatePollRequestBody {
///         title: "Sprint retro".to_owned(),
///         description: None,
///         duration_minutes: Some(45),
///         modality: Some("video".to_owned()),
///         time_slots: vec![TimeSlotRequestBody {
///             start_time: "2026-03-02T14:00:00Z".to_owned(),
///             end_time: "2026-03-02T14:45:00Z".to_owned(),
///         }],
///         participants: vec![ParticipantRequestBody {
///             name: "Ada".to_owned(),
///             email: "ada@example.com".to_owned(),
///         }],
///     });
///
///     create_poll(state, payload).await
/// }
/// ```
#[utoipa::path(
    post,
    path = "/api/v1/polls",
    request_body = CreatePollRequestBody,
    responses(
        (status = 201, description = "Poll created and invites dispatched", body = CreatePollResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["polls"],
    operation_id = "createPoll"
)]
#[post("/polls")]
pub async fn create_poll(
    state: web::Data<HttpState>,
    payload: web::Json<CreatePollRequestBody>,
) -> ApiResult<HttpResponse> {
    let draft = parse_poll_draft(payload.into_inner())?;
    let created = state.poll_commands.create_poll(draft).await?;
    Ok(HttpResponse::Created().json(CreatePollResponseBody::from(created)))
}

/// List every poll with slots and participants, newest poll first.
#[utoipa::path(
    get,
    path = "/api/v1/polls",
    responses(
        (status = 200, description = "Every poll, newest first", body = PollListResponseBody),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["polls"],
    operation_id = "listPolls"
)]
#[get("/polls")]
pub async fn list_polls(state: web::Data<HttpState>) -> ApiResult<web::Json<PollListResponseBody>> {
    let overviews = state.poll_queries.list_polls().await?;
    Ok(web::Json(PollListResponseBody {
        polls: overviews.into_iter().map(PollOverviewBody::from).collect(),
    }))
}

/// Read one poll with slots and participants.
#[utoipa::path(
    get,
    path = "/api/v1/polls/{poll_id}",
    params(("poll_id" = String, Path, description = "Poll identifier")),
    responses(
        (status = 200, description = "Poll with slots and participants", body = PollOverviewBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Poll not found", body = Error)
    ),
    tags = ["polls"],
    operation_id = "getPoll"
)]
#[get("/polls/{poll_id}")]
pub async fn get_poll(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PollOverviewBody>> {
    let poll_id = parse_poll_id(path.into_inner())?;
    let overview = state.poll_queries.poll_overview(poll_id).await?;
    Ok(web::Json(PollOverviewBody::from(overview)))
}

/// Cancel an active poll.
#[utoipa::path(
    post,
    path = "/api/v1/polls/{poll_id}/cancel",
    params(("poll_id" = String, Path, description = "Poll identifier")),
    responses(
        (status = 200, description = "Poll cancelled", body = PollBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Poll not found", body = Error),
        (status = 409, description = "Poll is not active", body = Error)
    ),
    tags = ["polls"],
    operation_id = "cancelPoll"
)]
#[post("/polls/{poll_id}/cancel")]
pub async fn cancel_poll(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PollBody>> {
    let poll_id = parse_poll_id(path.into_inner())?;
    let poll = state.poll_commands.cancel_poll(poll_id).await?;
    Ok(web::Json(PollBody::from(&poll)))
}

/// Expire an active poll.
#[utoipa::path(
    post,
    path = "/api/v1/polls/{poll_id}/expire",
    params(("poll_id" = String, Path, description = "Poll identifier")),
    responses(
        (status = 200, description = "Poll expired", body = PollBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Poll not found", body = Error),
        (status = 409, description = "Poll is not active", body = Error)
    ),
    tags = ["polls"],
    operation_id = "expirePoll"
)]
#[post("/polls/{poll_id}/expire")]
pub async fn expire_poll(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PollBody>> {
    let poll_id = parse_poll_id(path.into_inner())?;
    let poll = state.poll_commands.expire_poll(poll_id).await?;
    Ok(web::Json(PollBody::from(&poll)))
}

/// Evaluate completion now, selecting and finalizing the winner when every
/// participant has responded.
#[utoipa::path(
    post,
    path = "/api/v1/polls/{poll_id}/complete",
    params(("poll_id" = String, Path, description = "Poll identifier")),
    responses(
        (status = 200, description = "Completion evaluated", body = CompletionResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Poll not found", body = Error),
        (status = 409, description = "Poll is cancelled or expired", body = Error)
    ),
    tags = ["polls"],
    operation_id = "completePoll"
)]
#[post("/polls/{poll_id}/complete")]
pub async fn complete_poll(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CompletionResponseBody>> {
    let poll_id = parse_poll_id(path.into_inner())?;
    let report = state.poll_commands.complete_poll(poll_id).await?;
    Ok(web::Json(CompletionResponseBody::from(report)))
}

#[cfg(test)]
#[path = "polls_tests.rs"]
mod tests;
