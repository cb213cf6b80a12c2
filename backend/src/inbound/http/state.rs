//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{PollCommand, PollQuery, VotingCommand};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub poll_commands: Arc<dyn PollCommand>,
    pub poll_queries: Arc<dyn PollQuery>,
    pub voting: Arc<dyn VotingCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub poll_commands: Arc<dyn PollCommand>,
    pub poll_queries: Arc<dyn PollQuery>,
    pub voting: Arc<dyn VotingCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{FixturePollCommand, FixturePollQuery, FixtureVotingCommand};
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     poll_commands: Arc::new(FixturePollCommand),
    ///     poll_queries: Arc::new(FixturePollQuery),
    ///     voting: Arc::new(FixtureVotingCommand),
    /// });
    /// let _commands = state.poll_commands.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            poll_commands,
            poll_queries,
            voting,
        } = ports;
        Self {
            poll_commands,
            poll_queries,
            voting,
        }
    }
}
