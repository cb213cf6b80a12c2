//! Port for video-meeting booking providers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Request to book a hosted video meeting for the winning slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRequest {
    /// Meeting topic, usually the poll title.
    pub topic: String,
    /// Scheduled start instant.
    pub start_time: DateTime<Utc>,
    /// Scheduled length in minutes.
    pub duration_minutes: u32,
    /// Email addresses to invite.
    pub invitees: Vec<String>,
}

/// A booked video meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingBooking {
    /// Provider-side meeting identifier.
    pub meeting_id: String,
    /// URL participants use to join.
    pub join_url: String,
}

/// Errors raised by booking provider adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingProviderError {
    /// The provider could not be reached.
    #[error("booking provider transport failed: {message}")]
    Transport {
        /// Adapter-reported cause.
        message: String,
    },
    /// The provider answered with a non-success status.
    #[error("booking provider rejected the request with status {status}: {message}")]
    Status {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Response excerpt for the log line.
        message: String,
    },
    /// The provider's response body could not be interpreted.
    #[error("booking provider response could not be decoded: {message}")]
    Decode {
        /// Adapter-reported cause.
        message: String,
    },
}

impl BookingProviderError {
    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Helper for non-success provider statuses.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Helper for undecodable provider responses.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Port for creating video-conference bookings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingProvider: Send + Sync {
    /// Book a meeting for the given request.
    async fn create_meeting(
        &self,
        request: &MeetingRequest,
    ) -> Result<MeetingBooking, BookingProviderError>;
}

/// Fixture implementation returning a canned booking.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookingProvider;

#[async_trait]
impl BookingProvider for FixtureBookingProvider {
    async fn create_meeting(
        &self,
        _request: &MeetingRequest,
    ) -> Result<MeetingBooking, BookingProviderError> {
        Ok(MeetingBooking {
            meeting_id: "fixture-meeting".to_owned(),
            join_url: "https://video.invalid/fixture".to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[tokio::test]
    async fn fixture_returns_canned_booking() {
        let provider = FixtureBookingProvider;
        let request = MeetingRequest {
            topic: "Team sync".to_owned(),
            start_time: Utc::now(),
            duration_minutes: 30,
            invitees: vec!["ada@example.com".to_owned()],
        };
        let booking = provider
            .create_meeting(&request)
            .await
            .expect("fixture booking succeeds");
        assert_eq!(booking.meeting_id, "fixture-meeting");
    }

    #[rstest]
    fn status_error_carries_code() {
        let err = BookingProviderError::status(429, "rate limited");
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("rate limited"));
    }
}
