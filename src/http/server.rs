//! HTTP server startup logic.

use std::future::Future;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use axum::Router;
use axum_server::Handle;

use crate::config::HttpServerConfig;
use crate::scheduler::Scheduler;

use super::shutdown::{self, ShutdownSignal};

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid http.host or http.port: {0}")]
    Address(String),

    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Bind the listening socket for the configured host and port.
pub fn bind_listener(config: &HttpServerConfig) -> Result<TcpListener, ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Address(format!("{}:{}: {}", config.host, config.port, e)))?;

    let listener = TcpListener::bind(addr)?;
    listener.set_nonblocking(true)?;
    Ok(listener)
}

/// Start the scheduler and serve `app` on `listener` until a shutdown signal arrives.
///
/// This function blocks until the server shuts down. The scheduler is stopped
/// before the listener stops accepting connections.
pub async fn start_server(
    app: Router,
    listener: TcpListener,
    scheduler: Arc<Scheduler>,
) -> Result<(), ServerError> {
    serve_until(app, listener, scheduler, shutdown::shutdown_signal()).await
}

/// Same as [`start_server`], but shuts down when `signal` resolves instead of
/// waiting for SIGINT/SIGTERM.
pub async fn serve_until<F>(
    app: Router,
    listener: TcpListener,
    scheduler: Arc<Scheduler>,
    signal: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ShutdownSignal> + Send + 'static,
{
    let addr = listener.local_addr()?;
    let handle = Handle::new();

    scheduler.start();
    shutdown::setup_shutdown_handler(signal, handle.clone(), scheduler);

    tracing::info!(%addr, "Cron service listening");
    tracing::info!("Health check: http://{}/api/health", addr);
    tracing::info!("Manual trigger: POST http://{}/api/health/trigger", addr);

    axum_server::from_tcp(listener)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))
}
