//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Route handlers return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio_client::ApiError;
use thiserror::Error;

/// Application-level error type for the site.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Server-side session could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Api(err) => match err {
                ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
                ApiError::AuthFailed(_) => StatusCode::UNAUTHORIZED,
                ApiError::RequestFailed { status, .. } => match status {
                    Some(s) if *s == StatusCode::NOT_FOUND => StatusCode::NOT_FOUND,
                    Some(s) if *s == StatusCode::UNAUTHORIZED || *s == StatusCode::FORBIDDEN => {
                        StatusCode::UNAUTHORIZED
                    }
                    _ => StatusCode::BAD_GATEWAY,
                },
                ApiError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, status = %status, "Request rejected");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Api(ApiError::Session(_)) => "Internal server error".to_string(),
            Self::Api(ApiError::RequestFailed { .. }) if status == StatusCode::BAD_GATEWAY => {
                "The content service is unavailable".to_string()
            }
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Add a breadcrumb for admin actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("skills/9".to_string());
        assert_eq!(err.to_string(), "Not found: skills/9");

        let err = AppError::Internal("template failed".to_string());
        assert_eq!(err.to_string(), "Internal error: template failed");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_error_status_codes() {
        let not_found = ApiError::RequestFailed {
            status: Some(StatusCode::NOT_FOUND),
            message: "Failed to fetch skills: 404 Not Found".to_string(),
        };
        assert_eq!(get_status(not_found.into()), StatusCode::NOT_FOUND);

        let down = ApiError::RequestFailed {
            status: None,
            message: "Failed to fetch skills: could not connect to the API".to_string(),
        };
        assert_eq!(get_status(down.into()), StatusCode::BAD_GATEWAY);

        let rejected = ApiError::AuthFailed("Invalid credentials".to_string());
        assert_eq!(get_status(rejected.into()), StatusCode::UNAUTHORIZED);

        let bad_id = ApiError::InvalidArgument("id: empty".to_string());
        assert_eq!(get_status(bad_id.into()), StatusCode::BAD_REQUEST);
    }
}
