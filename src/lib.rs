//! finalize-cron: periodic caller for the game finalize endpoint.
//!
//! Calls `POST {api}/api/game/finalize` once at startup and then on a fixed
//! interval, logs every outcome, and exposes health and manual trigger routes.

pub mod config;
pub mod error;
pub mod finalize;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod scheduler;
pub mod state;

pub use config::AppConfig;
pub use error::AppError;
pub use finalize::{CallOutcome, FinalizeClient, FinalizeResult, Outcome, OutcomeKind, Trigger};
pub use scheduler::Scheduler;
pub use state::AppState;
