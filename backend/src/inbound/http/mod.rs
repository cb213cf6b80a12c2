//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod polls;
pub mod state;
pub mod suggestions;
pub mod validation;
pub mod voting;
