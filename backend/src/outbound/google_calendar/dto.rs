//! DTOs for the Google Calendar v3 events endpoint.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{CalendarEventRef, EventRequest};

#[derive(Debug, Serialize)]
pub(super) struct EventRequestDto {
    pub(super) summary: String,
    pub(super) description: String,
    pub(super) start: EventTimeDto,
    pub(super) end: EventTimeDto,
    pub(super) attendees: Vec<AttendeeDto>,
    pub(super) reminders: RemindersDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) location: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct EventTimeDto {
    #[serde(rename = "dateTime")]
    pub(super) date_time: String,
    #[serde(rename = "timeZone")]
    pub(super) time_zone: String,
}

#[derive(Debug, Serialize)]
pub(super) struct AttendeeDto {
    pub(super) email: String,
}

#[derive(Debug, Serialize)]
pub(super) struct RemindersDto {
    #[serde(rename = "useDefault")]
    pub(super) use_default: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct EventResponseDto {
    pub(super) id: String,
}

impl EventRequestDto {
    pub(super) fn from_domain(request: &EventRequest) -> Self {
        Self {
            summary: request.summary.clone(),
            description: request.description.clone(),
            start: EventTimeDto::from_instant(request.start_time),
            end: EventTimeDto::from_instant(request.end_time),
            attendees: request
                .attendees
                .iter()
                .map(|email| AttendeeDto {
                    email: email.clone(),
                })
                .collect(),
            reminders: RemindersDto { use_default: true },
            location: request.location.clone(),
        }
    }
}

impl EventTimeDto {
    fn from_instant(instant: DateTime<Utc>) -> Self {
        Self {
            date_time: instant.to_rfc3339_opts(SecondsFormat::Secs, true),
            time_zone: "UTC".to_owned(),
        }
    }
}

impl EventResponseDto {
    pub(super) fn into_domain_event_ref(self) -> CalendarEventRef {
        CalendarEventRef { event_id: self.id }
    }
}
