//! Domain ports and supporting types for the hexagonal boundary.

mod booking_provider;
mod calendar_provider;
mod finalize;
mod notification_ledger;
mod notifier;
mod poll_command;
mod poll_query;
mod poll_repository;
mod voting;

#[cfg(test)]
pub use booking_provider::MockBookingProvider;
pub use booking_provider::{
    BookingProvider, BookingProviderError, FixtureBookingProvider, MeetingBooking, MeetingRequest,
};
#[cfg(test)]
pub use calendar_provider::MockCalendarProvider;
pub use calendar_provider::{
    CalendarEventRef, CalendarProvider, CalendarProviderError, EventRequest,
    FixtureCalendarProvider,
};
#[cfg(test)]
pub use finalize::MockFinalizeMeeting;
pub use finalize::{FinalizationReport, FinalizeIntent, FinalizeMeeting, FixtureFinalizeMeeting};
#[cfg(test)]
pub use notification_ledger::MockNotificationLedger;
pub use notification_ledger::{
    FixtureNotificationLedger, NotificationKind, NotificationLedger, NotificationLedgerError,
    NotificationRecord,
};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{ConfirmationNotice, FixtureNotifier, InviteNotice, Notifier, NotifierError};
#[cfg(test)]
pub use poll_command::MockPollCommand;
pub use poll_command::{
    CompletionOutcome, CompletionReport, CreatedPoll, FixturePollCommand, PollCommand, VotingLink,
};
#[cfg(test)]
pub use poll_query::MockPollQuery;
pub use poll_query::{Ballot, FixturePollQuery, PollOverview, PollQuery};
#[cfg(test)]
pub use poll_repository::MockPollRepository;
pub use poll_repository::{PollRepository, PollRepositoryError};
#[cfg(test)]
pub use voting::MockVotingCommand;
pub use voting::{FixtureVotingCommand, SubmissionReceipt, VotingCommand};
