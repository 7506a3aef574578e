//! Client Configuration
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Platform API base URL (e.g., "https://amp.example")
    pub server_url: String,

    /// HTTP request timeout (default: 30s)
    pub http_timeout: Duration,

    /// Upper bound on session restore at startup (default: 10s)
    pub restore_timeout: Duration,

    /// Keyring service name for stored refresh tokens
    pub keyring_service: String,

    /// Log output format
    pub log_format: LogFormat,
}

fn secs_from_env(key: &str, default: u64) -> Result<Duration> {
    match env::var(key) {
        Ok(v) => v
            .trim()
            .parse()
            .map(Duration::from_secs)
            .with_context(|| format!("{key} must be a whole number of seconds, got {v:?}")),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let server_url = env::var("AMP_SERVER_URL")
            .unwrap_or_else(|_| "http://localhost:8080".into())
            .trim_end_matches('/')
            .to_string();
        if !(server_url.starts_with("http://") || server_url.starts_with("https://")) {
            bail!("AMP_SERVER_URL must be an http(s) URL, got {server_url:?}");
        }

        let log_format = match env::var("AMP_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("text") | Err(_) => LogFormat::Text,
            Ok(other) => bail!("AMP_LOG_FORMAT must be \"text\" or \"json\", got {other:?}"),
        };

        Ok(Self {
            server_url,
            http_timeout: secs_from_env("AMP_HTTP_TIMEOUT", 30)?,
            restore_timeout: secs_from_env("AMP_RESTORE_TIMEOUT", 10)?,
            keyring_service: env::var("AMP_KEYRING_SERVICE").unwrap_or_else(|_| "amp".into()),
            log_format,
        })
    }

    /// Create a config with defaults suitable for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            server_url: "http://localhost:8080".into(),
            http_timeout: Duration::from_secs(5),
            restore_timeout: Duration::from_millis(200),
            keyring_service: "amp-test".into(),
            log_format: LogFormat::Text,
        }
    }
}
