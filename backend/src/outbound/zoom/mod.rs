//! Zoom outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `BookingProvider`
//! port against Zoom's server-to-server OAuth and meetings APIs.

mod dto;
mod http_booking;

pub use http_booking::{ZoomBookingProvider, ZoomCredentials};
