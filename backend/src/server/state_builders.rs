//! Builders selecting real provider adapters or fixtures for the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use backend::domain::finalization::{
    FinalizationConfig, FinalizationCoordinator, FinalizationPorts,
};
use backend::domain::poll_service::{PollSchedulingService, PollServiceConfig, PollServicePorts};
use backend::domain::ports::{
    BookingProvider, CalendarProvider, FixtureBookingProvider, FixtureCalendarProvider,
    FixtureNotifier, Notifier,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::google_calendar::GoogleCalendarProvider;
use backend::outbound::persistence::{
    InMemoryNotificationLedger, InMemoryPollRepository, InMemoryStore,
};
use backend::outbound::sendgrid::SendGridNotifier;
use backend::outbound::zoom::ZoomBookingProvider;

use super::ServerConfig;

fn client_build_error(provider: &'static str, error: reqwest::Error) -> std::io::Error {
    std::io::Error::other(format!("{provider} client construction failed: {error}"))
}

/// Select the Zoom adapter when credentials are configured, otherwise the
/// fixture that books nothing.
fn build_booking_provider(config: &ServerConfig) -> std::io::Result<Arc<dyn BookingProvider>> {
    match &config.zoom {
        Some(credentials) => {
            let provider = ZoomBookingProvider::new(credentials.clone(), config.provider_timeout)
                .map_err(|error| client_build_error("Zoom", error))?;
            Ok(Arc::new(provider))
        }
        None => Ok(Arc::new(FixtureBookingProvider)),
    }
}

fn build_calendar_provider(config: &ServerConfig) -> std::io::Result<Arc<dyn CalendarProvider>> {
    match &config.calendar {
        Some(calendar) => {
            let provider = GoogleCalendarProvider::new(calendar.clone(), config.provider_timeout)
                .map_err(|error| client_build_error("Google Calendar", error))?;
            Ok(Arc::new(provider))
        }
        None => Ok(Arc::new(FixtureCalendarProvider)),
    }
}

fn build_notifier(config: &ServerConfig) -> std::io::Result<Arc<dyn Notifier>> {
    match &config.sendgrid {
        Some(sendgrid) => {
            let notifier = SendGridNotifier::new(sendgrid.clone(), config.provider_timeout)
                .map_err(|error| client_build_error("SendGrid", error))?;
            Ok(Arc::new(notifier))
        }
        None => Ok(Arc::new(FixtureNotifier)),
    }
}

/// Finalization steps run only for providers the operator configured; the
/// fixtures satisfy the port types but never produce real side effects.
fn finalization_config(config: &ServerConfig) -> FinalizationConfig {
    FinalizationConfig {
        video_booking_enabled: config.zoom.is_some(),
        calendar_enabled: config.calendar.is_some(),
        notifications_enabled: config.sendgrid.is_some(),
        provider_timeout: config.provider_timeout,
    }
}

/// Build the shared HTTP state over the in-memory store and the configured
/// provider adapters.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let store = Arc::new(InMemoryStore::default());
    let poll_repo = Arc::new(InMemoryPollRepository::new(store.clone()));
    let ledger = Arc::new(InMemoryNotificationLedger::new(store));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let booking = build_booking_provider(config)?;
    let calendar = build_calendar_provider(config)?;
    let notifier = build_notifier(config)?;

    let finalizer = Arc::new(FinalizationCoordinator::new(
        FinalizationPorts {
            poll_repo: poll_repo.clone(),
            booking,
            calendar,
            notifier: notifier.clone(),
            ledger: ledger.clone(),
        },
        clock.clone(),
        finalization_config(config),
    ));

    let service = Arc::new(PollSchedulingService::new(
        poll_repo,
        PollServicePorts {
            notifier,
            ledger,
            finalizer,
        },
        clock,
        PollServiceConfig {
            voting_base_url: config.voting_base_url.clone(),
            invites_enabled: config.sendgrid.is_some(),
        },
    ));

    Ok(web::Data::new(HttpState::new(HttpStatePorts {
        poll_commands: service.clone(),
        poll_queries: service.clone(),
        voting: service,
    })))
}
