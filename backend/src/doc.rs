//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (polls, voting,
//!   slot suggestions, health)
//! - **Schemas**: Request and response bodies plus the shared error payload
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::polls::{
    CompletionResponseBody, CreatePollRequestBody, CreatePollResponseBody, FinalizationRefsBody,
    ParticipantBody, ParticipantRequestBody, PollBody, PollListResponseBody, PollOverviewBody,
    SlotBody, TimeSlotRequestBody, VotingLinkBody,
};
use crate::inbound::http::suggestions::{SlotSuggestionsResponseBody, SuggestedSlotBody};
use crate::inbound::http::voting::{
    BallotResponseBody, SubmissionReceiptBody, SubmitResponsesRequestBody,
};

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Availability poll backend API",
        description = "HTTP interface for scheduling polls, availability ballots, and health probes.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::polls::create_poll,
        crate::inbound::http::polls::list_polls,
        crate::inbound::http::polls::get_poll,
        crate::inbound::http::polls::cancel_poll,
        crate::inbound::http::polls::expire_poll,
        crate::inbound::http::polls::complete_poll,
        crate::inbound::http::voting::get_ballot,
        crate::inbound::http::voting::submit_responses,
        crate::inbound::http::suggestions::slot_suggestions,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CreatePollRequestBody,
        TimeSlotRequestBody,
        ParticipantRequestBody,
        CreatePollResponseBody,
        PollBody,
        FinalizationRefsBody,
        SlotBody,
        ParticipantBody,
        VotingLinkBody,
        PollOverviewBody,
        PollListResponseBody,
        CompletionResponseBody,
        BallotResponseBody,
        SubmitResponsesRequestBody,
        SubmissionReceiptBody,
        SuggestedSlotBody,
        SlotSuggestionsResponseBody,
        Error,
        ErrorCode,
    )),
    tags(
        (name = "polls", description = "Poll lifecycle and slot suggestions"),
        (name = "voting", description = "Token-scoped ballot access and submission"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
