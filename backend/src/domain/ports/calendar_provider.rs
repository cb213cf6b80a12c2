//! Port for calendar providers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Request to create a calendar event for the winning slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRequest {
    /// Event summary, usually the poll title.
    pub summary: String,
    /// Event body; carries the join URL when a video meeting was booked.
    pub description: String,
    /// Event start instant.
    pub start_time: DateTime<Utc>,
    /// Event end instant.
    pub end_time: DateTime<Utc>,
    /// Attendee email addresses.
    pub attendees: Vec<String>,
    /// Optional location link, e.g. the video join URL.
    pub location: Option<String>,
}

/// Reference to a created calendar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEventRef {
    /// Provider-side event identifier.
    pub event_id: String,
}

/// Errors raised by calendar provider adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarProviderError {
    /// The provider could not be reached.
    #[error("calendar provider transport failed: {message}")]
    Transport {
        /// Adapter-reported cause.
        message: String,
    },
    /// The provider answered with a non-success status.
    #[error("calendar provider rejected the request with status {status}: {message}")]
    Status {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Response excerpt for the log line.
        message: String,
    },
    /// The provider's response body could not be interpreted.
    #[error("calendar provider response could not be decoded: {message}")]
    Decode {
        /// Adapter-reported cause.
        message: String,
    },
}

impl CalendarProviderError {
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

/// Port for creating calendar events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Create an event for the given request.
    async fn create_event(
        &self,
        request: &EventRequest,
    ) -> Result<CalendarEventRef, CalendarProviderError>;
}

/// Fixture implementation returning a canned event reference.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCalendarProvider;

#[async_trait]
impl CalendarProvider for FixtureCalendarProvider {
    async fn create_event(
        &self,
        _request: &EventRequest,
    ) -> Result<CalendarEventRef, CalendarProviderError> {
        Ok(CalendarEventRef {
            event_id: "fixture-event".to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rstest::rstest;

    use super::*;

    #[tokio::test]
    async fn fixture_returns_canned_event() {
        let provider = FixtureCalendarProvider;
        let start = Utc::now();
        let request = EventRequest {
            summary: "Team sync".to_owned(),
            description: "Scheduled by availability consensus".to_owned(),
            start_time: start,
            end_time: start + Duration::minutes(30),
            attendees: vec!["ada@example.com".to_owned()],
            location: None,
        };
        let created = provider
            .create_event(&request)
            .await
            .expect("fixture event succeeds");
        assert_eq!(created.event_id, "fixture-event");
    }

    #[rstest]
    fn decode_error_formats_message() {
        let err = CalendarProviderError::decode("not json");
        assert!(err.to_string().contains("not json"));
    }
}
