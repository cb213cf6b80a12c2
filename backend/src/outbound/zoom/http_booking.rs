//! Reqwest-backed Zoom booking adapter.
//!
//! This adapter owns transport details only: server-to-server OAuth token
//! exchange, meeting creation, HTTP error mapping, and JSON decoding into a
//! domain booking.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::dto::{MeetingRequestDto, MeetingResponseDto, TokenResponseDto};
use crate::domain::ports::{BookingProvider, BookingProviderError, MeetingBooking, MeetingRequest};

const TOKEN_ENDPOINT: &str = "https://zoom.us/oauth/token";
const MEETINGS_ENDPOINT: &str = "https://api.zoom.us/v2/users/me/meetings";

/// Server-to-server OAuth credentials for one Zoom account.
#[derive(Debug, Clone)]
pub struct ZoomCredentials {
    /// Zoom account identifier.
    pub account_id: String,
    /// OAuth client identifier.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
}

/// Booking adapter that creates meetings through the Zoom REST API.
///
/// Zoom's server-to-server flow issues short-lived tokens, so the adapter
/// exchanges credentials for a fresh token on every booking rather than
/// caching one across calls.
pub struct ZoomBookingProvider {
    client: Client,
    credentials: ZoomCredentials,
    token_endpoint: String,
    meetings_endpoint: String,
}

impl ZoomBookingProvider {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(credentials: ZoomCredentials, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            credentials,
            token_endpoint: TOKEN_ENDPOINT.to_owned(),
            meetings_endpoint: MEETINGS_ENDPOINT.to_owned(),
        })
    }

    /// Point the adapter at alternative endpoints, e.g. a local stub.
    #[must_use]
    pub fn with_endpoints(
        mut self,
        token_endpoint: impl Into<String>,
        meetings_endpoint: impl Into<String>,
    ) -> Self {
        self.token_endpoint = token_endpoint.into();
        self.meetings_endpoint = meetings_endpoint.into();
        self
    }

    async fn fetch_access_token(&self) -> Result<String, BookingProviderError> {
        let response = self
            .client
            .post(&self.token_endpoint)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .query(&[
                ("grant_type", "account_credentials"),
                ("account_id", self.credentials.account_id.as_str()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let decoded: TokenResponseDto = serde_json::from_slice(body.as_ref()).map_err(|error| {
            BookingProviderError::decode(format!("invalid Zoom token payload: {error}"))
        })?;
        Ok(decoded.access_token)
    }
}

#[async_trait]
impl BookingProvider for ZoomBookingProvider {
    async fn create_meeting(
        &self,
        request: &MeetingRequest,
    ) -> Result<MeetingBooking, BookingProviderError> {
        let token = self.fetch_access_token().await?;
        let response = self
            .client
            .post(&self.meetings_endpoint)
            .bearer_auth(token)
            .json(&MeetingRequestDto::from_domain(request))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_booking(body.as_ref())
    }
}

fn parse_booking(body: &[u8]) -> Result<MeetingBooking, BookingProviderError> {
    let decoded: MeetingResponseDto = serde_json::from_slice(body).map_err(|error| {
        BookingProviderError::decode(format!("invalid Zoom meeting payload: {error}"))
    })?;
    Ok(decoded.into_domain_booking())
}

fn map_transport_error(error: reqwest::Error) -> BookingProviderError {
    BookingProviderError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> BookingProviderError {
    BookingProviderError::status(status.as_u16(), body_preview(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network Zoom mapping helpers.

    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    fn request() -> MeetingRequest {
        MeetingRequest {
            topic: "Sprint retro".to_owned(),
            start_time: Utc
                .with_ymd_and_hms(2026, 3, 2, 14, 0, 0)
                .single()
                .expect("valid instant"),
            duration_minutes: 45,
            invitees: vec!["ada@example.com".to_owned(), "brian@example.com".to_owned()],
        }
    }

    #[test]
    fn serialises_scheduled_meeting_with_open_settings() {
        let body = serde_json::to_value(MeetingRequestDto::from_domain(&request()))
            .expect("request should serialise");

        assert_eq!(body["topic"], "Sprint retro");
        assert_eq!(body["type"], 2, "bookings are scheduled meetings");
        assert_eq!(body["start_time"], "2026-03-02T14:00:00Z");
        assert_eq!(body["duration"], 45);
        assert_eq!(body["timezone"], "UTC");
        assert_eq!(body["settings"]["join_before_host"], true);
        assert_eq!(body["settings"]["waiting_room"], false);
        assert_eq!(
            body["settings"]["meeting_invitees"][1]["email"],
            "brian@example.com"
        );
    }

    #[test]
    fn parses_meeting_payload_into_domain_booking() {
        let body = r#"{
            "id": 82840282284,
            "join_url": "https://zoom.us/j/82840282284",
            "topic": "Sprint retro"
        }"#;

        let booking = parse_booking(body.as_bytes()).expect("payload should decode");
        assert_eq!(booking.meeting_id, "82840282284");
        assert_eq!(booking.join_url, "https://zoom.us/j/82840282284");
    }

    #[test]
    fn rejects_meeting_payload_without_join_url() {
        let error = parse_booking(br#"{"id": 42}"#).expect_err("decode should fail");
        assert!(
            matches!(error, BookingProviderError::Decode { .. }),
            "missing fields should map to Decode errors",
        );
    }

    #[test]
    fn status_error_carries_code_and_squashed_preview() {
        let body = "{\n  \"code\": 124,\n  \"message\": \"Invalid access token\"\n}";
        let error = map_status_error(StatusCode::UNAUTHORIZED, body.as_bytes());

        match error {
            BookingProviderError::Status { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "{ \"code\": 124, \"message\": \"Invalid access token\" }");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn long_bodies_are_truncated_in_previews() {
        let body = "x".repeat(500);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163, "160 chars plus ellipsis");
        assert!(preview.ends_with("..."));
    }
}
