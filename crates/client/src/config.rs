//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `NEXT_PUBLIC_API_BASE_URL` - Backend API base URL (default: `http://localhost:5000/api`)
//! - `FOLIO_API_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Backend base URL used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "NEXT_PUBLIC_API_BASE_URL";

const TIMEOUT_ENV: &str = "FOLIO_API_TIMEOUT_SECS";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid base URL {0}: {1}")]
    InvalidBaseUrl(String, String),
}

/// Backend connection settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL; resource paths are appended as path segments.
    pub base_url: Url,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Build a configuration for an explicit base URL with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the URL does not parse or is
    /// not `http`/`https`.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            base_url: parse_base_url(&base_url)?,
            timeout: Self::timeout_from_env()?,
        })
    }

    /// Read only `FOLIO_API_TIMEOUT_SECS`, for callers that supply their own
    /// base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the variable is set but not a
    /// whole number of seconds.
    pub fn timeout_from_env() -> Result<Duration, ConfigError> {
        let secs = match std::env::var(TIMEOUT_ENV) {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidEnvVar(TIMEOUT_ENV.to_string(), e.to_string()))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidBaseUrl(raw.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidBaseUrl(
            raw.to_string(),
            "must be an http or https URL".to_string(),
        ));
    }

    Ok(url)
}
