//! CLI configuration.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BOOKSTAND_API_BASE_URL` - Backend base URL (default: `http://localhost:5000/api`)
//! - `BOOKSTAND_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
//! - `BOOKSTAND_SESSION_FILE` - Where the login is persisted (default: `.bookstand/session.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//!
//! Command-line flags take precedence over the environment.

use std::path::PathBuf;

use bookstand_client::config::{get_env_or_default, get_optional_env};
use bookstand_client::{ClientConfig, ConfigError};

/// Session file used when `BOOKSTAND_SESSION_FILE` is unset.
pub const DEFAULT_SESSION_FILE: &str = ".bookstand/session.json";

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub client: ClientConfig,
    pub session_file: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl CliConfig {
    /// Load from the environment, then apply flag overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value cannot be parsed.
    pub fn load(api_url: Option<&str>, session_file: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut client = ClientConfig::from_env()?;
        if let Some(url) = api_url {
            client = client.with_base_url(url)?;
        }

        Ok(Self {
            client,
            session_file: session_file.unwrap_or_else(|| {
                PathBuf::from(get_env_or_default("BOOKSTAND_SESSION_FILE", DEFAULT_SESSION_FILE))
            }),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_environment() {
        let config = CliConfig::load(
            Some("http://127.0.0.1:9000/api"),
            Some(PathBuf::from("/tmp/bookstand-test.json")),
        )
        .unwrap();
        assert_eq!(config.client.api_base_url.as_str(), "http://127.0.0.1:9000/api");
        assert_eq!(config.session_file, PathBuf::from("/tmp/bookstand-test.json"));
    }

    #[test]
    fn test_invalid_flag_url() {
        assert!(CliConfig::load(Some("nope"), None).is_err());
    }
}
