//! Port for outbound participant notifications.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Invite notice sent when a poll opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteNotice {
    /// Recipient display name.
    pub recipient_name: String,
    /// Recipient address.
    pub recipient_email: String,
    /// Poll title.
    pub poll_title: String,
    /// The recipient's personal voting link.
    pub voting_link: String,
}

impl InviteNotice {
    /// Subject line used for invites.
    pub fn subject(&self) -> String {
        format!("You're invited: {}", self.poll_title)
    }
}

/// Confirmation notice sent once a winning slot is finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationNotice {
    /// Recipient display name.
    pub recipient_name: String,
    /// Recipient address.
    pub recipient_email: String,
    /// Poll title.
    pub poll_title: String,
    /// Finalized meeting start.
    pub start_time: DateTime<Utc>,
    /// Meeting length in minutes.
    pub duration_minutes: u32,
    /// Video join URL when a booking was obtained.
    pub join_url: Option<String>,
}

impl ConfirmationNotice {
    /// Subject line used for confirmations.
    pub fn subject(&self) -> String {
        format!("Confirmed: {}", self.poll_title)
    }
}

/// Errors raised by notifier adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifierError {
    /// The delivery service could not be reached.
    #[error("notifier transport failed: {message}")]
    Transport {
        /// Adapter-reported cause.
        message: String,
    },
    /// The delivery service refused the message.
    #[error("notifier rejected the message with status {status}: {message}")]
    Status {
        /// HTTP status code returned by the service.
        status: u16,
        /// Response excerpt for the log line.
        message: String,
    },
}

impl NotifierError {
    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Helper for refused messages.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }
}

/// Port for sending invite and confirmation notices.
///
/// Each send stands alone: one recipient's failure never affects another's
/// delivery, so callers loop and log rather than abort.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send an invite notice.
    async fn send_invite(&self, notice: &InviteNotice) -> Result<(), NotifierError>;

    /// Send a confirmation notice.
    async fn send_confirmation(&self, notice: &ConfirmationNotice) -> Result<(), NotifierError>;
}

/// Fixture implementation that accepts every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotifier;

#[async_trait]
impl Notifier for FixtureNotifier {
    async fn send_invite(&self, _notice: &InviteNotice) -> Result<(), NotifierError> {
        Ok(())
    }

    async fn send_confirmation(&self, _notice: &ConfirmationNotice) -> Result<(), NotifierError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn invite() -> InviteNotice {
        InviteNotice {
            recipient_name: "Ada".to_owned(),
            recipient_email: "ada@example.com".to_owned(),
            poll_title: "Team sync".to_owned(),
            voting_link: "http://localhost/poll/x?token=y".to_owned(),
        }
    }

    #[rstest]
    fn invite_subject_names_the_poll() {
        assert_eq!(invite().subject(), "You're invited: Team sync");
    }

    #[rstest]
    fn confirmation_subject_names_the_poll() {
        let notice = ConfirmationNotice {
            recipient_name: "Ada".to_owned(),
            recipient_email: "ada@example.com".to_owned(),
            poll_title: "Team sync".to_owned(),
            start_time: Utc::now(),
            duration_minutes: 30,
            join_url: None,
        };
        assert_eq!(notice.subject(), "Confirmed: Team sync");
    }

    #[tokio::test]
    async fn fixture_accepts_messages() {
        let notifier = FixtureNotifier;
        notifier
            .send_invite(&invite())
            .await
            .expect("fixture accepts invites");
    }
}
