//! finalize-cron entry point.
//!
//! Initializes tracing, loads configuration from defaults, an optional TOML
//! file and the environment, binds the HTTP listener, starts the finalize
//! scheduler, and serves until SIGINT or SIGTERM.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finalize_cron::config::{load_env_file, AppConfig, DEFAULT_ENV_FILE, DEFAULT_LOG_FILTER};
use finalize_cron::http::{bind_listener, start_server};
use finalize_cron::routes::create_router;
use finalize_cron::{AppState, FinalizeClient, Scheduler};

/// finalize-cron: calls the game finalize endpoint every minute
#[derive(Parser, Debug)]
#[command(name = "finalize-cron", version, about)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Env file to load before reading the environment (skipped if missing)
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    env_file: String,

    /// Log level filter (e.g., "finalize_cron=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log format, "text" or "json" (overrides the config file)
    #[arg(long)]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Variables already set in the environment win over the env file
    let env_file_result = load_env_file(&args.env_file);

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(format) = args.log_format {
        config.logging.format = format;
    }

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    match env_file_result {
        Some(Ok(())) => tracing::info!(path = %args.env_file, "Loaded env file"),
        Some(Err(e)) => tracing::warn!(
            path = %args.env_file,
            error = %e,
            "Failed to load env file, it may be only partly applied"
        ),
        None => {}
    }

    tracing::info!(
        url = %config.finalize_url(),
        interval_secs = config.interval.as_secs(),
        timeout_secs = config.timeout.as_secs(),
        has_cron_secret = config.has_cron_secret(),
        "Loaded configuration"
    );
    if !config.has_cron_secret() {
        tracing::warn!("CRON_SECRET not set. API calls may fail.");
    }

    let config = Arc::new(config);
    let client = FinalizeClient::new(&config)?;
    let scheduler = Arc::new(Scheduler::new(client.clone(), config.interval));

    let state = AppState::new(config.clone(), client);
    let app = create_router(state);

    let listener = bind_listener(&config.http)?;
    start_server(app, listener, scheduler).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
