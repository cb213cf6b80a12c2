//! DTOs for the Zoom OAuth and meetings endpoints.
//!
//! The adapter serialises domain requests into these transport DTOs and
//! decodes responses back into domain bookings in one pass.

use serde::{Deserialize, Serialize};

use crate::domain::ports::{MeetingBooking, MeetingRequest};

/// Meeting type code for a scheduled (non-recurring) meeting.
const SCHEDULED_MEETING_TYPE: u8 = 2;

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub(super) access_token: String,
}

#[derive(Debug, Serialize)]
pub(super) struct MeetingRequestDto {
    pub(super) topic: String,
    #[serde(rename = "type")]
    pub(super) meeting_type: u8,
    pub(super) start_time: String,
    pub(super) duration: u32,
    pub(super) timezone: String,
    pub(super) settings: MeetingSettingsDto,
}

#[derive(Debug, Serialize)]
pub(super) struct MeetingSettingsDto {
    pub(super) host_video: bool,
    pub(super) participant_video: bool,
    pub(super) join_before_host: bool,
    pub(super) waiting_room: bool,
    pub(super) meeting_invitees: Vec<MeetingInviteeDto>,
}

#[derive(Debug, Serialize)]
pub(super) struct MeetingInviteeDto {
    pub(super) email: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct MeetingResponseDto {
    pub(super) id: i64,
    pub(super) join_url: String,
}

impl MeetingRequestDto {
    pub(super) fn from_domain(request: &MeetingRequest) -> Self {
        Self {
            topic: request.topic.clone(),
            meeting_type: SCHEDULED_MEETING_TYPE,
            // Zoom expects GMT instants as yyyy-MM-ddTHH:mm:ssZ.
            start_time: request.start_time.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            duration: request.duration_minutes,
            timezone: "UTC".to_owned(),
            settings: MeetingSettingsDto {
                host_video: true,
                participant_video: true,
                join_before_host: true,
                waiting_room: false,
                meeting_invitees: request
                    .invitees
                    .iter()
                    .map(|email| MeetingInviteeDto {
                        email: email.clone(),
                    })
                    .collect(),
            },
        }
    }
}

impl MeetingResponseDto {
    pub(super) fn into_domain_booking(self) -> MeetingBooking {
        MeetingBooking {
            meeting_id: self.id.to_string(),
            join_url: self.join_url,
        }
    }
}
