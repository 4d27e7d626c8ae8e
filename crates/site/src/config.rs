//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `REVALIDATION_SECRET` - Shared secret for the cache revalidation webhook
//!
//! ## Optional
//! - `FOLIO_HOST` - Bind address (default: 127.0.0.1)
//! - `FOLIO_PORT` - Listen port (default: 3000)
//! - `FOLIO_BASE_URL` - Public URL for the site (default: `http://localhost:3000`)
//! - `FOLIO_PAGE_CACHE_TTL_SECS` - Home page cache lifetime (default: 3600)
//! - `NEXT_PUBLIC_API_BASE_URL` - Backend API base URL (default: `http://localhost:5000/api`)
//! - `FOLIO_API_TIMEOUT_SECS` - Backend request timeout (default: 30)
//! - `SITE_OWNER_NAME` - Name shown in the page header and footer
//! - `SITE_TAGLINE` - Line shown under the owner's name
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use folio_client::ClientConfig;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_REVALIDATION_SECRET_LENGTH: usize = 16;

const DEFAULT_OWNER_NAME: &str = "Andrew Rapier";
const DEFAULT_TAGLINE: &str = "Full-Stack Developer | Producer | Technology Enthusiast";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
    #[error(transparent)]
    Client(#[from] folio_client::ConfigError),
}

/// Site application configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Shared secret checked by `POST /api/revalidate`
    pub revalidation_secret: SecretString,
    /// How long a rendered home page stays cached
    pub page_cache_ttl: Duration,
    /// Backend connection settings
    pub api: ClientConfig,
    /// Header and footer text
    pub profile: ProfileConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Text identifying the site owner.
#[derive(Debug, Clone)]
pub struct ProfileConfig {
    pub owner_name: String,
    pub tagline: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            owner_name: DEFAULT_OWNER_NAME.to_string(),
            tagline: DEFAULT_TAGLINE.to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("FOLIO_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("FOLIO_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("FOLIO_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("FOLIO_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("FOLIO_BASE_URL", "http://localhost:3000");
        let revalidation_secret = get_secret("REVALIDATION_SECRET")?;
        let page_cache_ttl = get_env_or_default("FOLIO_PAGE_CACHE_TTL_SECS", "3600")
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("FOLIO_PAGE_CACHE_TTL_SECS".to_string(), e.to_string())
            })?;

        let api = ClientConfig::from_env()?;
        let profile = ProfileConfig::from_env();
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            base_url,
            revalidation_secret,
            page_cache_ttl,
            api,
            profile,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Check the revalidation secret against the length and placeholder
    /// rules. A weak secret is still accepted; callers log the result.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InsecureSecret` describing the weakness.
    pub fn check_secret_strength(&self) -> Result<(), ConfigError> {
        validate_secret_strength(self.revalidation_secret.expose_secret(), "REVALIDATION_SECRET")
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ProfileConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            owner_name: get_optional_env("SITE_OWNER_NAME").unwrap_or(defaults.owner_name),
            tagline: get_optional_env("SITE_TAGLINE").unwrap_or(defaults.tagline),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a secret is long enough and not a placeholder.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_REVALIDATION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_REVALIDATION_SECRET_LENGTH,
                secret.len()
            ),
        ));
    }

    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load a required secret from environment.
fn get_secret(key: &str) -> Result<SecretString, ConfigError> {
    get_required_env(key).map(SecretString::from)
}

/// Compare a presented secret against the configured one in constant time.
#[must_use]
pub fn secret_matches(expected: &SecretString, presented: &str) -> bool {
    constant_time_compare(expected.expose_secret(), presented)
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}
