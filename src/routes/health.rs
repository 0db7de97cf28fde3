//! Health and manual trigger endpoints.
//!
//! The health endpoints report the static configuration summary and never touch
//! the remote API, so they answer even when the finalize endpoint is down. The
//! trigger endpoint runs one finalize call outside the schedule and waits for it.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::{FINALIZE_INTERVAL_LABEL, SERVICE_NAME};
use crate::error::AppError;
use crate::finalize::{FinalizeResult, OutcomeSummary, Trigger};
use crate::state::AppState;

const STATUS_HEALTHY: &str = "healthy";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub service: &'static str,
    pub version: &'static str,
    pub config: ConfigSummary,
    /// Seconds since startup, only on the detailed endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    pub api_url: String,
    pub has_cron_secret: bool,
    pub interval: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    pub success: bool,
    pub message: &'static str,
    pub outcome: OutcomeSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<FinalizeResult>,
}

fn health_response(state: &AppState, uptime: Option<f64>) -> HealthResponse {
    HealthResponse {
        status: STATUS_HEALTHY,
        timestamp: chrono::Utc::now().to_rfc3339(),
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        config: ConfigSummary {
            api_url: state.config.api_base_url.clone(),
            has_cron_secret: state.config.has_cron_secret(),
            interval: FINALIZE_INTERVAL_LABEL,
        },
        uptime,
    }
}

/// Liveness check with a configuration summary.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health_response(&state, None))
}

/// Same as [`health`], plus process uptime.
pub async fn detailed(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = state.started_at.elapsed().as_secs_f64();
    Json(health_response(&state, Some(uptime)))
}

/// Run one finalize call now and report its outcome.
///
/// Network and application failures are part of a completed call and still
/// answer 200; only a fault inside the call task maps to 500.
pub async fn trigger(State(state): State<AppState>) -> Result<Json<TriggerResponse>, AppError> {
    tracing::info!("Manual trigger requested");

    let client = state.client.clone();
    let call = tokio::spawn(async move { client.call(Trigger::Manual).await }).await?;

    tracing::info!(outcome = %call.kind(), "Manual trigger completed");

    Ok(Json(TriggerResponse {
        success: true,
        message: "Manual trigger completed",
        outcome: call.summary(),
        result: call.result().cloned(),
    }))
}
