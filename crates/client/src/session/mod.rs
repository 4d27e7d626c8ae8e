//! Session state: an authentication flag plus an opaque bearer token.
//!
//! A [`Session`] is the explicit request context passed to every API call.
//! It owns nothing but a handle to a [`SessionStore`]; values are read from
//! the store on each access, never cached, so a cleared token takes effect on
//! the next call.
//!
//! Stores:
//! - [`MemoryStore`] - process-local, used by the site per request and in tests
//! - [`FileStore`] - JSON file, used by the CLI so a login outlives the process

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;
use thiserror::Error;

/// Keys under which session values are persisted.
pub mod keys {
    /// `"true"` when a login succeeded. Any other value means logged out.
    pub const IS_AUTHENTICATED: &str = "isAuthenticated";

    /// Bearer token returned by the backend login endpoint.
    pub const AUTH_TOKEN: &str = "authToken";
}

/// Errors raised by a [`SessionStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store cannot be reached at all (e.g. a poisoned lock).
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the backing file failed.
    #[error("session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a JSON object of strings.
    #[error("session file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Key/value persistence for session state.
///
/// Semantics follow browser local storage: string keys, string values,
/// no expiry.
pub trait SessionStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Request context carrying the caller's session.
///
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    /// Wrap a store.
    #[must_use]
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// A fresh session backed by an empty [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    /// Current bearer token, read from the store now.
    ///
    /// Unreadable stores and empty values both yield `None`.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        match self.store.get(keys::AUTH_TOKEN) {
            Ok(token) => token.filter(|t| !t.is_empty()).map(SecretString::from),
            Err(e) => {
                tracing::warn!(error = %e, "session token unreadable; sending request without it");
                None
            }
        }
    }

    /// Whether the persisted flag marks this session as logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        crate::guard::is_authenticated(self.store())
    }

    /// Persist a successful login. The token is written before the flag so a
    /// reader never sees the flag without a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn establish(&self, token: &str) -> Result<(), StoreError> {
        self.store.set(keys::AUTH_TOKEN, token)?;
        self.store.set(keys::IS_AUTHENTICATED, "true")
    }

    /// Forget the login. The flag goes first so the guard closes even if the
    /// token removal fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(keys::IS_AUTHENTICATED)?;
        self.store.remove(keys::AUTH_TOKEN)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_fresh_session_is_anonymous() {
        let session = Session::in_memory();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_establish_then_clear() {
        let session = Session::in_memory();
        session.establish("tok-123").unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.token().unwrap().expose_secret(), "tok-123");

        session.clear().unwrap();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_token_reads_store_on_every_call() {
        let session = Session::in_memory();
        session.establish("first").unwrap();
        session.store().set(keys::AUTH_TOKEN, "second").unwrap();
        assert_eq!(session.token().unwrap().expose_secret(), "second");
    }

    #[test]
    fn test_clones_share_state() {
        let session = Session::in_memory();
        let clone = session.clone();
        session.establish("shared").unwrap();
        assert!(clone.is_authenticated());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::in_memory();
        session.establish("super-secret-token").unwrap();
        let debug = format!("{session:?}");
        assert!(!debug.contains("super-secret-token"));
    }
}
