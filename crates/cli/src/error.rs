//! CLI error type.

use folio_client::{ApiError, ConfigError};
use thiserror::Error;

/// Errors that end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid JSON for --data: {0}")]
    InvalidData(#[source] serde_json::Error),

    #[error("--data must be a JSON object")]
    DataNotObject,

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid site URL {0}: {1}")]
    InvalidSiteUrl(String, String),

    #[error("Revalidation failed ({status}): {message}")]
    Revalidate { status: String, message: String },

    #[error("No home directory; set FOLIO_SESSION_FILE")]
    NoSessionPath,

    #[error("Not logged in. Run `folio login -e <email>` first.")]
    NotLoggedIn,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not format output: {0}")]
    Output(#[from] serde_json::Error),
}
