//! Port for the append-only notification ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::polls::{ParticipantId, PollId};

/// Category of a recorded notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Voting invitation sent at poll creation.
    Invite,
    /// Meeting confirmation sent at finalization.
    Confirmation,
}

/// One successfully delivered notification.
///
/// The ledger is append-only and written only after the delivery service
/// accepted the message; failed attempts appear in logs, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    /// Poll the notification belongs to.
    pub poll_id: PollId,
    /// Recipient participant.
    pub participant_id: ParticipantId,
    /// Invite or confirmation.
    pub kind: NotificationKind,
    /// Subject line as sent.
    pub subject: String,
    /// Delivery instant.
    pub sent_at: DateTime<Utc>,
}

/// Errors raised by notification ledger adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationLedgerError {
    /// The ledger store rejected the write or read.
    #[error("notification ledger storage failed: {message}")]
    Storage {
        /// Adapter-reported cause.
        message: String,
    },
}

impl NotificationLedgerError {
    /// Helper for storage failures.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Port for recording and reading delivered notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationLedger: Send + Sync {
    /// Append a delivered notification.
    async fn record(&self, record: &NotificationRecord) -> Result<(), NotificationLedgerError>;

    /// Read the ledger entries for one poll in append order.
    async fn for_poll(
        &self,
        poll_id: PollId,
    ) -> Result<Vec<NotificationRecord>, NotificationLedgerError>;
}

/// Fixture implementation that drops every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationLedger;

#[async_trait]
impl NotificationLedger for FixtureNotificationLedger {
    async fn record(&self, _record: &NotificationRecord) -> Result<(), NotificationLedgerError> {
        Ok(())
    }

    async fn for_poll(
        &self,
        _poll_id: PollId,
    ) -> Result<Vec<NotificationRecord>, NotificationLedgerError> {
        Ok(Vec::new())
    }
}
