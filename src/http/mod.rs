//! Process lifecycle around the HTTP listener.
//!
//! The listener is bound before the scheduler starts, so a port conflict is
//! fatal before any finalize call goes out. SIGTERM/SIGINT stop the scheduler
//! first and then shut the listener down.

mod server;
mod shutdown;

pub use server::{bind_listener, serve_until, start_server, ServerError};
pub use shutdown::ShutdownSignal;
