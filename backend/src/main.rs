//! Backend entry-point: reads provider configuration and serves the REST API.

mod server;

use std::env;
use std::net::SocketAddr;

use actix_web::web;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::google_calendar::GoogleCalendarConfig;
use backend::outbound::sendgrid::SendGridConfig;
use backend::outbound::zoom::ZoomCredentials;
use server::{ServerConfig, create_server};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_SENDER_NAME: &str = "Meeting Scheduler";

fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn zoom_from_env() -> Option<ZoomCredentials> {
    match (
        optional_env("ZOOM_ACCOUNT_ID"),
        optional_env("ZOOM_CLIENT_ID"),
        optional_env("ZOOM_CLIENT_SECRET"),
    ) {
        (Some(account_id), Some(client_id), Some(client_secret)) => Some(ZoomCredentials {
            account_id,
            client_id,
            client_secret,
        }),
        (None, None, None) => None,
        _ => {
            warn!(
                "partial Zoom configuration ignored; set ZOOM_ACCOUNT_ID, ZOOM_CLIENT_ID and ZOOM_CLIENT_SECRET together"
            );
            None
        }
    }
}

fn calendar_from_env() -> Option<GoogleCalendarConfig> {
    match (
        optional_env("GOOGLE_CALENDAR_ID"),
        optional_env("GOOGLE_CALENDAR_TOKEN"),
    ) {
        (Some(calendar_id), Some(api_token)) => Some(GoogleCalendarConfig {
            calendar_id,
            api_token,
        }),
        (None, None) => None,
        _ => {
            warn!(
                "partial calendar configuration ignored; set GOOGLE_CALENDAR_ID and GOOGLE_CALENDAR_TOKEN together"
            );
            None
        }
    }
}

fn sendgrid_from_env() -> Option<SendGridConfig> {
    match (
        optional_env("SENDGRID_API_KEY"),
        optional_env("SENDGRID_FROM_EMAIL"),
    ) {
        (Some(api_key), Some(sender_email)) => Some(SendGridConfig {
            api_key,
            sender_email,
            sender_name: optional_env("SENDGRID_FROM_NAME")
                .unwrap_or_else(|| DEFAULT_SENDER_NAME.to_owned()),
        }),
        (None, None) => None,
        _ => {
            warn!(
                "partial SendGrid configuration ignored; set SENDGRID_API_KEY and SENDGRID_FROM_EMAIL together"
            );
            None
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let bind_addr: SocketAddr = optional_env("BIND_ADDR")
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;
    let base_url = optional_env("APP_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

    let mut config = ServerConfig::new(bind_addr, base_url);
    if let Some(credentials) = zoom_from_env() {
        config = config.with_zoom(credentials);
    }
    if let Some(calendar) = calendar_from_env() {
        config = config.with_calendar(calendar);
    }
    if let Some(sendgrid) = sendgrid_from_env() {
        config = config.with_sendgrid(sendgrid);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
