//! SendGrid outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `Notifier` port
//! against the SendGrid v3 mail send API.

mod dto;
mod http_mailer;

pub use http_mailer::{SendGridConfig, SendGridNotifier};
