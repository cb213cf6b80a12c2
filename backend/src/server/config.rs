//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use backend::outbound::google_calendar::GoogleCalendarConfig;
use backend::outbound::sendgrid::SendGridConfig;
use backend::outbound::zoom::ZoomCredentials;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) voting_base_url: String,
    pub(crate) provider_timeout: Duration,
    pub(crate) zoom: Option<ZoomCredentials>,
    pub(crate) calendar: Option<GoogleCalendarConfig>,
    pub(crate) sendgrid: Option<SendGridConfig>,
}

impl ServerConfig {
    /// Construct a server configuration with every provider disabled.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, voting_base_url: impl Into<String>) -> Self {
        Self {
            bind_addr,
            voting_base_url: voting_base_url.into(),
            provider_timeout: Duration::from_secs(10),
            zoom: None,
            calendar: None,
            sendgrid: None,
        }
    }

    /// Attach Zoom credentials so completed video polls book a real meeting.
    ///
    /// Without credentials the server falls back to the fixture booking
    /// provider and completed polls carry no join link.
    #[must_use]
    pub fn with_zoom(mut self, credentials: ZoomCredentials) -> Self {
        self.zoom = Some(credentials);
        self
    }

    /// Attach a Google Calendar target for winning-slot events.
    #[must_use]
    pub fn with_calendar(mut self, config: GoogleCalendarConfig) -> Self {
        self.calendar = Some(config);
        self
    }

    /// Attach SendGrid credentials for invite and confirmation email.
    #[must_use]
    pub fn with_sendgrid(mut self, config: SendGridConfig) -> Self {
        self.sendgrid = Some(config);
        self
    }

    /// Override the per-call timeout applied to outbound provider requests.
    #[must_use]
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(
            dead_code,
            reason = "Exercised by bootstrap tests; retained for fixture access"
        )
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
