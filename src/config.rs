//! Client configuration module

use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::Args;

/// Remote API settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Base URL of the Iris storefront API
    #[arg(
        long = "api-url",
        env = "IRIS_API_URL",
        default_value = "http://localhost:3000"
    )]
    pub base_url: String,

    /// Request timeout in seconds (the payment event stream is exempt)
    #[arg(long, env = "IRIS_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub http_timeout_secs: u64,
}

/// Session persistence settings.
#[derive(Debug, Clone, Args)]
pub struct SessionConfig {
    /// Path of the session file (defaults to ~/.config/iris/session.yaml)
    #[arg(long, env = "IRIS_SESSION_FILE")]
    pub session_file: Option<PathBuf>,
}

impl SessionConfig {
    /// Resolves the session file path, falling back to the current
    /// directory when no home directory can be determined.
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        if let Some(path) = &self.session_file {
            return path.clone();
        }

        env::var_os("HOME").map_or_else(
            || PathBuf::from("iris-session.yaml"),
            |home| {
                Path::new(&home)
                    .join(".config")
                    .join("iris")
                    .join("session.yaml")
            },
        )
    }
}

/// Payment watch settings.
#[derive(Debug, Clone, Args)]
pub struct WatchConfig {
    /// Seconds between payment status polls
    #[arg(long, env = "IRIS_POLL_INTERVAL_SECS", default_value_t = 5)]
    pub poll_interval_secs: u64,
}

impl WatchConfig {
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Iris storefront client configuration.
#[derive(Debug, Args)]
pub struct Config {
    /// Remote API settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Session persistence settings.
    #[command(flatten)]
    pub session: SessionConfig,

    /// Payment watch settings.
    #[command(flatten)]
    pub watch: WatchConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
