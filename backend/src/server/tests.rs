//! Tests for the server bootstrap, covering readiness signalling.

use super::{ServerConfig, create_server};
use actix_web::web;
use backend::inbound::http::health::HealthState;
use rstest::{fixture, rstest};

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn config() -> ServerConfig {
    // Port zero keeps the test hermetic; the listener picks a free port.
    ServerConfig::new(([127, 0, 0, 1], 0).into(), "http://localhost:8080")
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready_once_bound(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) {
    assert!(!health_state.is_ready(), "state should start unready");
    assert_eq!(config.bind_addr().port(), 0);

    let _server = create_server(health_state.clone(), config).expect("server should build");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}
