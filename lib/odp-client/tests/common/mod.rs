#![allow(dead_code, missing_docs, clippy::expect_used)]
use std::time::Duration;

use rstest::fixture;
use tracing::info;

use odp_client::{OdpClient, OdpConfig};

mod mock_server;
pub use self::mock_server::*;

pub const CLIENT_ID: &str = "odp-test-client";
pub const CLIENT_SECRET: &str = "odp-test-secret";
pub const SCOPE: &str = "ODP.Metadata ODP.Project";

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

/// Configuration pointing every URL at the mock server.
pub fn mock_config(server: &MockOdp) -> OdpConfig {
    OdpConfig::builder(
        server.url("/public"),
        server.url(""),
        CLIENT_ID,
        CLIENT_SECRET,
    )
    .expect("valid urls")
    .with_admin_api(server.url("/admin"))
    .expect("valid admin url")
    .with_scope_str(SCOPE)
    .with_timeout(Some(Duration::from_secs(2)))
    .build()
    .expect("valid config")
}

/// Same as [`mock_config`] without an admin API.
pub fn public_only_config(server: &MockOdp) -> OdpConfig {
    OdpConfig::builder(
        server.url("/public"),
        server.url(""),
        CLIENT_ID,
        CLIENT_SECRET,
    )
    .expect("valid urls")
    .with_scope_str(SCOPE)
    .build()
    .expect("valid config")
}

/// An URL nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local address").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

#[fixture]
pub async fn odp() -> MockOdp {
    init_tracing();
    MockOdp::start(MockOptions::default()).await
}

pub fn client_for(server: &MockOdp) -> OdpClient {
    OdpClient::new(mock_config(server)).expect("client")
}
