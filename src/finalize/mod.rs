//! Remote caller for the game finalize endpoint.
//!
//! A finalize call is a single `POST {api}/api/game/finalize` with an empty JSON
//! body and the shared cron secret header. The client never returns an error:
//! every transport failure and every application-level failure is folded into a
//! [`CallOutcome`] so scheduled callers can log it and move on.

mod client;
mod outcome;
mod types;

pub use client::{FinalizeClient, Trigger};
pub use outcome::{CallOutcome, Outcome, OutcomeKind, OutcomeSummary};
pub use types::{FinalizeResult, Winner};
