//! Errors returned by [`ApiClient`](crate::ApiClient) operations.

use reqwest::StatusCode;
use thiserror::Error;

use crate::session::StoreError;

/// Failure of a backend operation.
///
/// Callers decide how to present these; the client itself only logs.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status, or the request never
    /// produced a usable response (connection refused, timeout, bad JSON).
    /// `status` is `None` in the latter case.
    #[error("{message}")]
    RequestFailed {
        status: Option<StatusCode>,
        message: String,
    },

    /// An argument was missing or malformed; no request was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The backend rejected the login. Carries the server-provided message.
    #[error("{0}")]
    AuthFailed(String),

    /// The session store could not be read or written.
    #[error("Session store error: {0}")]
    Session(#[from] StoreError),
}

impl ApiError {
    /// HTTP status of a failed request, if the backend answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether the backend reported the record as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub(crate) fn transport(action: &str, err: &reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "could not connect to the API".to_string()
        } else {
            err.to_string()
        };

        Self::RequestFailed {
            status: None,
            message: format!("Failed to {action}: {reason}"),
        }
    }
}
