//! Domain primitives and aggregates.
//!
//! Purpose: Define strongly typed scheduling entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - polls — poll, slot, participant and response aggregates.
//! - ports — hexagonal boundary traits and their fixture implementations.
//! - scoring — availability scores and winning-slot selection.
//! - poll_service — application service driving the poll lifecycle.
//! - finalization — post-completion meeting coordination.

pub mod error;
pub mod finalization;
pub mod polls;
pub mod poll_service;
pub mod ports;
pub mod scoring;

pub use self::error::{Error, ErrorCode};
pub use self::polls::{
    AccessToken, MeetingModality, NewPoll, Participant, ParticipantDraft, ParticipantId, Poll,
    PollDraft, PollId, PollStatus, SlotAnswers, SlotDraft, SlotId, SlotResponse, TimeSlot,
    suggest_slots, voting_link,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such poll"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
