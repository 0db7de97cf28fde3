//! Classified result of one finalize call.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::FinalizeResult;

/// What happened during one finalize call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// 2xx response with `success: true`
    Success(FinalizeResult),
    /// 2xx response that did not report success
    AppFailure {
        /// `error` field of the envelope, or the decode failure reason
        error: Option<String>,
        /// Decoded envelope, absent when the body could not be decoded
        result: Option<FinalizeResult>,
    },
    /// Non-2xx response
    HttpError { status: u16, message: String },
    ConnectionRefused,
    HostNotFound,
    /// Any other transport failure, including the call timeout
    Network { message: String, timed_out: bool },
}

/// Flat tag for [`Outcome`], used in logs and JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    AppFailure,
    HttpError,
    ConnectionRefused,
    HostNotFound,
    NetworkError,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::AppFailure => "app_failure",
            OutcomeKind::HttpError => "http_error",
            OutcomeKind::ConnectionRefused => "connection_refused",
            OutcomeKind::HostNotFound => "host_not_found",
            OutcomeKind::NetworkError => "network_error",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finalize call outcome stamped with its start time and wall-clock duration.
///
/// Owned by the call that produced it and consumed for logging or for the
/// manual trigger response; never stored.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub outcome: Outcome,
}

/// JSON view of a [`CallOutcome`]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeSummary {
    pub kind: OutcomeKind,
    pub timestamp: String,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CallOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match &self.outcome {
            Outcome::Success(_) => OutcomeKind::Success,
            Outcome::AppFailure { .. } => OutcomeKind::AppFailure,
            Outcome::HttpError { .. } => OutcomeKind::HttpError,
            Outcome::ConnectionRefused => OutcomeKind::ConnectionRefused,
            Outcome::HostNotFound => OutcomeKind::HostNotFound,
            Outcome::Network { .. } => OutcomeKind::NetworkError,
        }
    }

    /// Short human-readable detail: the success message, the remote error, or the transport error.
    pub fn detail(&self) -> Option<String> {
        match &self.outcome {
            Outcome::Success(result) => result.message.clone(),
            Outcome::AppFailure { error, .. } => error.clone(),
            Outcome::HttpError { status, message } => Some(format!("{} ({})", message, status)),
            Outcome::ConnectionRefused => Some("connection refused".to_string()),
            Outcome::HostNotFound => Some("host not found".to_string()),
            Outcome::Network { message, .. } => Some(message.clone()),
        }
    }

    /// The decoded response envelope, when the remote answered with one.
    pub fn result(&self) -> Option<&FinalizeResult> {
        match &self.outcome {
            Outcome::Success(result) => Some(result),
            Outcome::AppFailure { result, .. } => result.as_ref(),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.outcome, Outcome::Network { timed_out: true, .. })
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }

    pub fn summary(&self) -> OutcomeSummary {
        OutcomeSummary {
            kind: self.kind(),
            timestamp: self.started_at.to_rfc3339(),
            duration_ms: self.duration_ms(),
            detail: self.detail(),
        }
    }

    /// Emit the outcome in the current span.
    pub fn log(&self) {
        let duration_ms = self.duration_ms();
        match &self.outcome {
            Outcome::Success(result) => {
                tracing::info!(duration_ms, "Finalization successful");
                if let Some(winner) = &result.winner {
                    tracing::info!(
                        user_id = %winner.user_id,
                        score = winner.score,
                        ticket_id = winner.ticket_id.as_deref(),
                        "Round winner"
                    );
                }
                if let Some(message) = &result.message {
                    tracing::info!(message = %message, "Finalize message");
                }
            }
            Outcome::AppFailure { error, .. } => {
                tracing::warn!(error = error.as_deref(), duration_ms, "Finalization failed");
            }
            Outcome::HttpError { status, message } => {
                tracing::error!(status, error = %message, duration_ms, "Finalize API error");
            }
            Outcome::ConnectionRefused => {
                tracing::error!(duration_ms, "Connection refused. Is the main API running?");
            }
            Outcome::HostNotFound => {
                tracing::error!(duration_ms, "Host not found");
            }
            Outcome::Network { message, timed_out } => {
                tracing::error!(error = %message, timed_out, duration_ms, "Network error");
            }
        }
    }
}
