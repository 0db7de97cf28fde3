//! HTTP client for the finalize endpoint.

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::time::Instant;

use chrono::Utc;
use tracing::Instrument;

use crate::config::{AppConfig, CRON_SECRET_HEADER};

use super::outcome::{CallOutcome, Outcome};
use super::types::FinalizeResult;

/// What caused a finalize call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Fired by the scheduler (startup call or a tick)
    Scheduled,
    /// Requested through the manual trigger route
    Manual,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Scheduled => write!(f, "scheduled"),
            Trigger::Manual => write!(f, "manual"),
        }
    }
}

/// Client for `POST {api}/api/game/finalize`.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct FinalizeClient {
    http: reqwest::Client,
    url: String,
    cron_secret: String,
}

impl FinalizeClient {
    /// Build a client for the configured endpoint, secret, and timeout.
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            url: config.finalize_url(),
            cron_secret: config.cron_secret.clone(),
        })
    }

    /// Target URL of the finalize call
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Perform one finalize call and log its outcome.
    ///
    /// Never fails: every error is reported through the returned [`CallOutcome`].
    pub async fn call(&self, trigger: Trigger) -> CallOutcome {
        let span = tracing::info_span!("finalize", trigger = %trigger, url = %self.url);

        async move {
            let started_at = Utc::now();
            let start = Instant::now();
            tracing::info!("Calling finalize API");

            let outcome = self.send().await;
            let call = CallOutcome {
                started_at,
                duration: start.elapsed(),
                outcome,
            };
            call.log();
            call
        }
        .instrument(span)
        .await
    }

    async fn send(&self) -> Outcome {
        let response = match self
            .http
            .post(&self.url)
            .header(CRON_SECRET_HEADER, &self.cron_secret)
            .json(&serde_json::json!({}))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return classify_transport_error(&e),
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return classify_transport_error(&e),
        };

        if !status.is_success() {
            let message = remote_error_message(&body)
                .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
            return Outcome::HttpError {
                status: status.as_u16(),
                message,
            };
        }

        match serde_json::from_slice::<FinalizeResult>(&body) {
            Ok(result) if result.success => Outcome::Success(result),
            Ok(result) => Outcome::AppFailure {
                error: result.error.clone(),
                result: Some(result),
            },
            Err(e) => Outcome::AppFailure {
                error: Some(format!("invalid response body: {}", e)),
                result: None,
            },
        }
    }
}

/// Extract the `error` string of a JSON error body, if there is one.
fn remote_error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}

/// Map a transport failure onto the outcome taxonomy.
///
/// Timeouts win over everything else; otherwise the source chain is searched
/// for a refused connection or a failed name lookup.
fn classify_transport_error(err: &reqwest::Error) -> Outcome {
    if err.is_timeout() {
        return Outcome::Network {
            message: error_chain(err),
            timed_out: true,
        };
    }

    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::ConnectionRefused {
                return Outcome::ConnectionRefused;
            }
        }
        if is_dns_failure(cause) {
            return Outcome::HostNotFound;
        }
        source = cause.source();
    }

    Outcome::Network {
        message: error_chain(err),
        timed_out: false,
    }
}

// hyper-util reports resolver failures as a "dns error" wrapping the getaddrinfo error
fn is_dns_failure(cause: &(dyn StdError + 'static)) -> bool {
    let text = cause.to_string();
    text.starts_with("dns error") || text.contains("failed to lookup address")
}

/// Render an error and its sources as `outer: inner: innermost`.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
