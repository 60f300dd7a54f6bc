//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BOOKSTAND_API_BASE_URL` - Base URL of the REST backend, including the
//!   `/api` prefix (default: `http://localhost:5000/api`)
//! - `BOOKSTAND_TIMEOUT_SECS` - Per-request timeout in seconds (default: 10)

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Base URL used when `BOOKSTAND_API_BASE_URL` is unset.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Request timeout used when `BOOKSTAND_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Settings for the HTTP adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL; every request path is appended to it
    pub api_base_url: Url,
    /// Fixed per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_values(
            get_optional_env("BOOKSTAND_API_BASE_URL").as_deref(),
            get_optional_env("BOOKSTAND_TIMEOUT_SECS").as_deref(),
        )
    }

    /// Build a configuration from raw values, applying defaults for `None`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for an unparsable URL or timeout.
    pub fn from_values(
        api_base_url: Option<&str>,
        timeout_secs: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let api_base_url = match api_base_url {
            Some(raw) => parse_base_url(raw)?,
            None => parse_base_url(DEFAULT_API_BASE_URL)?,
        };
        let timeout = match timeout_secs {
            Some(raw) => parse_timeout(raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_base_url,
            timeout,
        })
    }

    /// Replace the base URL, e.g. from a command-line flag.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `raw` is not an absolute
    /// http(s) URL.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_base_url = parse_base_url(raw)?;
        Ok(self)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("BOOKSTAND_API_BASE_URL".to_string(), msg);

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base".to_string()));
    }
    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let secs = raw.trim().parse::<u64>().map_err(|e| {
        ConfigError::InvalidEnvVar("BOOKSTAND_TIMEOUT_SECS".to_string(), e.to_string())
    })?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "BOOKSTAND_TIMEOUT_SECS".to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// Get an optional environment variable, treating empty values as unset.
#[must_use]
pub fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
#[must_use]
pub fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}
