//! Participant-facing voting handlers.
//!
//! Access is granted by the capability token embedded in each voting link;
//! there is no login. Unknown tokens and unknown polls produce the same
//! not-found response so the API never confirms which part was wrong.
//!
//! ```text
//! GET  /api/v1/polls/{poll_id}/ballot
//! POST /api/v1/polls/{poll_id}/responses
//! ```

use std::collections::HashMap;

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{Ballot, SubmissionReceipt};
use crate::domain::{AccessToken, ApiResult, Error, SlotAnswers, SlotId};
use crate::inbound::http::polls::{ParticipantBody, PollBody, SlotBody, parse_poll_id};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error};

/// Query parameters accepted by the ballot endpoint.
#[derive(Debug, Deserialize)]
pub struct BallotQuery {
    pub token: Option<String>,
}

/// Response payload for a participant's ballot.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BallotResponseBody {
    pub poll: PollBody,
    pub slots: Vec<SlotBody>,
    pub participant: ParticipantBody,
    /// Answers on record keyed by slot id; empty before the first submission.
    pub prior_answers: HashMap<String, bool>,
}

/// Request payload for submitting availability answers.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponsesRequestBody {
    /// Capability token from the participant's voting link.
    pub token: String,
    /// Availability keyed by slot id. Slots missing from the map are
    /// recorded as unavailable; unknown slot ids are ignored.
    pub answers: HashMap<String, bool>,
}

/// Response payload for a recorded submission.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceiptBody {
    pub first_submission: bool,
    pub all_responded: bool,
    pub poll_completed: bool,
}

impl From<Ballot> for BallotResponseBody {
    fn from(ballot: Ballot) -> Self {
        Self {
            poll: PollBody::from(&ballot.poll),
            slots: ballot.slots.iter().map(SlotBody::from).collect(),
            participant: ParticipantBody::from(&ballot.participant),
            prior_answers: ballot
                .prior_answers
                .into_iter()
                .map(|(slot_id, available)| (slot_id.to_string(), available))
                .collect(),
        }
    }
}

impl From<SubmissionReceipt> for SubmissionReceiptBody {
    fn from(receipt: SubmissionReceipt) -> Self {
        Self {
            first_submission: receipt.first_submission,
            all_responded: receipt.all_responded,
            poll_completed: receipt.poll_completed,
        }
    }
}

fn parse_answers(answers: HashMap<String, bool>) -> Result<SlotAnswers, Error> {
    let mut parsed = SlotAnswers::with_capacity(answers.len());
    for (raw, available) in answers {
        let slot_id = Uuid::parse_str(&raw).map_err(|_| {
            Error::invalid_request("answers must be keyed by slot UUIDs").with_details(json!({
                "field": "answers",
                "value": raw,
                "code": "invalid_uuid",
            }))
        })?;
        parsed.insert(SlotId::new(slot_id), available);
    }
    Ok(parsed)
}

/// Resolve the ballot for the participant a voting token identifies.
#[utoipa::path(
    get,
    path = "/api/v1/polls/{poll_id}/ballot",
    params(
        ("poll_id" = String, Path, description = "Poll identifier"),
        ("token" = String, Query, description = "Capability token from the voting link")
    ),
    responses(
        (status = 200, description = "Ballot for the participant the token resolves to", body = BallotResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Poll or token not recognised", body = Error)
    ),
    tags = ["voting"],
    operation_id = "getBallot"
)]
#[get("/polls/{poll_id}/ballot")]
pub async fn get_ballot(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<BallotQuery>,
) -> ApiResult<web::Json<BallotResponseBody>> {
    let poll_id = parse_poll_id(path.into_inner())?;
    let token = query
        .into_inner()
        .token
        .ok_or_else(|| missing_field_error(FieldName::new("token")))?;
    let ballot = state
        .poll_queries
        .ballot(poll_id, &AccessToken::new(token))
        .await?;
    Ok(web::Json(BallotResponseBody::from(ballot)))
}

/// Record a participant's availability answers.
#[utoipa::path(
    post,
    path = "/api/v1/polls/{poll_id}/responses",
    params(("poll_id" = String, Path, description = "Poll identifier")),
    request_body = SubmitResponsesRequestBody,
    responses(
        (status = 200, description = "Responses recorded", body = SubmissionReceiptBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Poll or token not recognised", body = Error),
        (status = 409, description = "Poll is no longer accepting responses", body = Error)
    ),
    tags = ["voting"],
    operation_id = "submitResponses"
)]
#[post("/polls/{poll_id}/responses")]
pub async fn submit_responses(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<SubmitResponsesRequestBody>,
) -> ApiResult<web::Json<SubmissionReceiptBody>> {
    let poll_id = parse_poll_id(path.into_inner())?;
    let body = payload.into_inner();
    let answers = parse_answers(body.answers)?;
    let receipt = state
        .voting
        .submit_responses(poll_id, &AccessToken::new(body.token), answers)
        .await?;
    Ok(web::Json(SubmissionReceiptBody::from(receipt)))
}

#[cfg(test)]
#[path = "voting_tests.rs"]
mod tests;
