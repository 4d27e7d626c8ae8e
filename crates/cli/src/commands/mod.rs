//! Command implementations.
//!
//! Every command receives a [`Context`] holding the API client and the
//! file-backed session, and writes its result as pretty JSON to stdout.

pub mod auth;
pub mod content;
pub mod revalidate;
pub mod users;

use std::io::Write;
use std::path::PathBuf;

use folio_client::{ApiClient, ClientConfig, FileStore, Session};
use serde_json::Value;

use crate::error::CliError;

/// Environment variable overriding the session file location.
pub const SESSION_FILE_ENV: &str = "FOLIO_SESSION_FILE";

/// Shared state for a command run.
pub struct Context {
    pub client: ApiClient,
    pub session: Session,
}

impl Context {
    /// Build the client from the environment (or `base_url`) and open the
    /// session file.
    ///
    /// # Errors
    ///
    /// Returns `CliError` if the configuration is invalid or no session file
    /// location can be determined.
    pub fn new(base_url: Option<&str>) -> Result<Self, CliError> {
        let path = match std::env::var(SESSION_FILE_ENV) {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => FileStore::default_path().ok_or(CliError::NoSessionPath)?,
        };

        Self::open(&client_config(base_url)?, path)
    }

    /// Build a context for `config` with the session stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns `CliError` if the HTTP client cannot be built.
    pub fn open(config: &ClientConfig, path: impl Into<PathBuf>) -> Result<Self, CliError> {
        let store = FileStore::new(path);
        tracing::debug!(path = %store.path().display(), "using session file");

        Ok(Self {
            client: ApiClient::new(config)?,
            session: Session::new(store),
        })
    }
}

/// Client settings for a run. An explicit `base_url` replaces
/// `NEXT_PUBLIC_API_BASE_URL` entirely; only the timeout is still read from
/// the environment.
fn client_config(base_url: Option<&str>) -> Result<ClientConfig, CliError> {
    let config = match base_url {
        Some(url) => ClientConfig {
            timeout: ClientConfig::timeout_from_env()?,
            ..ClientConfig::new(url)?
        },
        None => ClientConfig::from_env()?,
    };
    Ok(config)
}

/// Write `value` to stdout as pretty JSON.
///
/// # Errors
///
/// Returns `CliError` if stdout cannot be written.
pub fn emit(value: &Value) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
