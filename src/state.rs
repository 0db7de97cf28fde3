//! Shared application state for request handlers.

use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;
use crate::finalize::FinalizeClient;

/// Shared application state, cloneable across handlers.
///
/// Holds the immutable configuration, the finalize client used by the manual
/// trigger, and the process start instant for uptime reporting.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub client: FinalizeClient,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, client: FinalizeClient) -> Self {
        Self {
            config,
            client,
            started_at: Instant::now(),
        }
    }
}
