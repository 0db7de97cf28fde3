//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::net::TcpListener;
use std::time::Duration;

use finalize_cron::config::AppConfig;
use finalize_cron::FinalizeClient;

pub const TEST_SECRET: &str = "test-cron-secret";

/// Config pointing at `base_url` with the test secret and the given timeout.
pub fn config_for(base_url: &str, timeout: Duration) -> AppConfig {
    AppConfig {
        api_base_url: base_url.trim_end_matches('/').to_string(),
        cron_secret: TEST_SECRET.to_string(),
        timeout,
        ..AppConfig::default()
    }
}

pub fn client_for(base_url: &str) -> FinalizeClient {
    FinalizeClient::new(&config_for(base_url, Duration::from_secs(5))).unwrap()
}

/// Base URL of a local port that nothing listens on.
pub fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
