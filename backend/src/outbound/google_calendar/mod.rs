//! Google Calendar outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `CalendarProvider`
//! port against the Google Calendar v3 events API.

mod dto;
mod http_events;

pub use http_events::{GoogleCalendarConfig, GoogleCalendarProvider};
