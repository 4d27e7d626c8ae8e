//! Revalidation webhook.
//!
//! The CMS backend calls this after content changes so the cached home page
//! is rebuilt on the next request instead of waiting for its TTL.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use crate::config::secret_matches;
use crate::state::AppState;

/// Webhook request body.
#[derive(Debug, Deserialize)]
pub struct RevalidateRequest {
    pub secret: Option<String>,
}

/// Successful webhook response.
#[derive(Debug, Serialize)]
pub struct RevalidateResponse {
    pub revalidated: bool,
    /// Milliseconds since the Unix epoch.
    pub now: i64,
}

/// Invalidate cached pages.
///
/// POST /api/revalidate
///
/// A body that is missing, not JSON, or carries the wrong secret gets 401
/// and leaves the cache untouched.
#[instrument(skip_all)]
pub async fn revalidate(State(state): State<AppState>, body: Bytes) -> Response {
    let presented = serde_json::from_slice::<RevalidateRequest>(&body)
        .ok()
        .and_then(|req| req.secret);

    let authorized = presented
        .as_deref()
        .is_some_and(|secret| secret_matches(&state.config().revalidation_secret, secret));

    if !authorized {
        tracing::warn!("revalidation rejected: invalid secret");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid secret" })),
        )
            .into_response();
    }

    state.invalidate_pages().await;
    tracing::info!("pages revalidated");

    Json(RevalidateResponse {
        revalidated: true,
        now: chrono::Utc::now().timestamp_millis(),
    })
    .into_response()
}
