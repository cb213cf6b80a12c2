//! Reqwest-backed Google Calendar events adapter.
//!
//! This adapter owns transport details only: event serialisation, endpoint
//! construction, HTTP error mapping, and JSON decoding into a domain event
//! reference.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{EventRequestDto, EventResponseDto};
use crate::domain::ports::{
    CalendarEventRef, CalendarProvider, CalendarProviderError, EventRequest,
};

const EVENTS_BASE: &str = "https://www.googleapis.com/calendar/v3/calendars";

/// Target calendar and API token for event creation.
///
/// The token is expected to carry the `calendar.events` scope; refreshing it
/// is the operator's concern, not the adapter's.
#[derive(Debug, Clone)]
pub struct GoogleCalendarConfig {
    /// Calendar identifier, usually the owning account's email address.
    pub calendar_id: String,
    /// OAuth bearer token presented on every request.
    pub api_token: String,
}

/// Calendar adapter that inserts events through the Google Calendar REST API.
pub struct GoogleCalendarProvider {
    client: Client,
    config: GoogleCalendarConfig,
    events_base: String,
}

impl GoogleCalendarProvider {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        config: GoogleCalendarConfig,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            config,
            events_base: EVENTS_BASE.to_owned(),
        })
    }

    /// Point the adapter at an alternative API base, e.g. a local stub.
    #[must_use]
    pub fn with_events_base(mut self, events_base: impl Into<String>) -> Self {
        self.events_base = events_base.into();
        self
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarProvider {
    async fn create_event(
        &self,
        request: &EventRequest,
    ) -> Result<CalendarEventRef, CalendarProviderError> {
        let url = events_url(&self.events_base, &self.config.calendar_id)?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_token)
            .json(&EventRequestDto::from_domain(request))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_event_ref(body.as_ref())
    }
}

/// Build the events collection URL, percent-encoding the calendar id as one
/// path segment. `sendUpdates=all` asks Google to email the attendees.
fn events_url(events_base: &str, calendar_id: &str) -> Result<Url, CalendarProviderError> {
    let mut url = Url::parse(events_base).map_err(|error| {
        CalendarProviderError::transport(format!("invalid events base URL: {error}"))
    })?;
    url.path_segments_mut()
        .map_err(|()| CalendarProviderError::transport("events base URL cannot carry a path"))?
        .push(calendar_id)
        .push("events");
    url.query_pairs_mut().append_pair("sendUpdates", "all");
    Ok(url)
}

fn parse_event_ref(body: &[u8]) -> Result<CalendarEventRef, CalendarProviderError> {
    let decoded: EventResponseDto = serde_json::from_slice(body).map_err(|error| {
        CalendarProviderError::decode(format!("invalid calendar event payload: {error}"))
    })?;
    Ok(decoded.into_domain_event_ref())
}

fn map_transport_error(error: reqwest::Error) -> CalendarProviderError {
    CalendarProviderError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CalendarProviderError {
    CalendarProviderError::status(status.as_u16(), body_preview(body))
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
