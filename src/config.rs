//! Configuration loading and constants.
//!
//! `AppConfig` is assembled once at startup from built-in defaults, an optional
//! TOML file, and the process environment (`INNO_API_URL`, `CRON_SECRET`, `PORT`).
//! It is immutable afterwards and shared behind an `Arc`.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

// =============================================================================
// Finalize Call Constants
// =============================================================================

/// Seconds between two scheduled finalize calls
pub const FINALIZE_INTERVAL_SECS: u64 = 60;

/// Hard timeout for one finalize call, in seconds
pub const FINALIZE_TIMEOUT_SECS: u64 = 30;

/// Path of the finalize endpoint, appended to the API base URL
pub const FINALIZE_PATH: &str = "/api/game/finalize";

/// Header carrying the shared cron secret
pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

/// Human-readable interval reported by the health endpoints
pub const FINALIZE_INTERVAL_LABEL: &str = formatcp!("{} seconds", FINALIZE_INTERVAL_SECS);

// =============================================================================
// Environment Variables
// =============================================================================

pub const ENV_API_URL: &str = "INNO_API_URL";
pub const ENV_CRON_SECRET: &str = "CRON_SECRET";
pub const ENV_PORT: &str = "PORT";

// =============================================================================
// Defaults
// =============================================================================

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

pub const DEFAULT_HTTP_PORT: u16 = 3002;

/// Env file loaded at startup when present
pub const DEFAULT_ENV_FILE: &str = "config.env";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "finalize_cron=info,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Service name reported by the health endpoints
pub const SERVICE_NAME: &str = "guess-game-cron";

/// Seconds the listener waits for open connections after a shutdown signal
pub const SHUTDOWN_GRACE_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the API exposing the finalize endpoint, without trailing slash
    pub api_base_url: String,
    /// Shared secret sent in the `x-cron-secret` header (may be empty)
    pub cron_secret: String,
    /// HTTP listener configuration
    pub http: HttpServerConfig,
    /// Period between scheduled calls
    pub interval: Duration,
    /// Timeout of a single finalize call
    pub timeout: Duration,
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// On-disk shape of the optional TOML file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    finalize: FinalizeFileConfig,
    #[serde(default)]
    http: HttpServerConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
struct FinalizeFileConfig {
    api_url: Option<String>,
    cron_secret: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            cron_secret: String::new(),
            http: HttpServerConfig::default(),
            interval: Duration::from_secs(FINALIZE_INTERVAL_SECS),
            timeout: Duration::from_secs(FINALIZE_TIMEOUT_SECS),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then apply the process environment.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                toml::from_str(&contents)?
            }
            None => FileConfig::default(),
        };

        Self::from_parts(file, |key| std::env::var(key).ok())
    }

    /// Build configuration from a TOML document and an environment lookup.
    ///
    /// Split out from [`AppConfig::load`] so the precedence rules can be tested
    /// without touching the process environment.
    pub fn from_toml_and_env<F>(contents: &str, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_parts(toml::from_str(contents)?, env)
    }

    fn from_parts<F>(file: FileConfig, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty variables count as unset
        let env = |key: &str| env(key).filter(|v| !v.is_empty());

        let api_base_url = env(ENV_API_URL)
            .or(file.finalize.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_base_url = api_base_url.trim_end_matches('/').to_string();
        if api_base_url.is_empty() {
            return Err(ConfigError::Validation(
                "API base URL must not be empty".to_string(),
            ));
        }

        let cron_secret = env(ENV_CRON_SECRET)
            .or(file.finalize.cron_secret)
            .unwrap_or_default();

        let mut http = file.http;
        if let Some(port) = env(ENV_PORT) {
            http.port = port.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("{} must be a port number, got '{}'", ENV_PORT, port))
            })?;
        }

        Ok(Self {
            api_base_url,
            cron_secret,
            http,
            logging: file.logging,
            ..Self::default()
        })
    }

    /// Full URL of the finalize endpoint
    pub fn finalize_url(&self) -> String {
        format!("{}{}", self.api_base_url, FINALIZE_PATH)
    }

    pub fn has_cron_secret(&self) -> bool {
        !self.cron_secret.is_empty()
    }
}

/// Load an env file into the process environment, if it exists.
///
/// Variables already set are kept. Returns `None` when there is no file; an
/// `Err` means the file was at most partly applied.
pub fn load_env_file<P: AsRef<Path>>(path: P) -> Option<Result<(), dotenv::Error>> {
    let path = path.as_ref();
    path.exists().then(|| dotenv::from_path(path))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
