//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits for various infrastructure concerns:
//!
//! - **persistence**: in-memory poll store and notification ledger
//! - **zoom**: video-meeting bookings via Zoom's REST API
//! - **google_calendar**: calendar events via the Google Calendar v3 API
//! - **sendgrid**: invite and confirmation mail via the SendGrid v3 API
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod google_calendar;
pub mod persistence;
pub mod sendgrid;
pub mod zoom;
