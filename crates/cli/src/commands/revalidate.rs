//! Trigger the site's revalidation webhook.
//!
//! # Usage
//!
//! ```bash
//! folio revalidate --site http://localhost:3000 --secret "$REVALIDATION_SECRET"
//! ```

use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use url::Url;

use super::emit;
use crate::error::CliError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// POST the secret to `{site}/api/revalidate` and print the reply.
///
/// # Errors
///
/// Returns `CliError` if the site URL is invalid, the request fails, or the
/// site rejects the secret.
pub async fn run(site: &str, secret: &SecretString) -> Result<(), CliError> {
    let url = webhook_url(site)?;
    tracing::debug!(%url, "calling revalidation webhook");

    let response = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?
        .post(url)
        .json(&json!({ "secret": secret.expose_secret() }))
        .send()
        .await?;

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status != StatusCode::OK {
        return Err(CliError::Revalidate {
            status: status.to_string(),
            message: body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("no message")
                .to_string(),
        });
    }

    tracing::info!("site revalidated");
    emit(&body)
}

fn webhook_url(site: &str) -> Result<Url, CliError> {
    let invalid = |reason: String| CliError::InvalidSiteUrl(site.to_string(), reason);

    let mut url = Url::parse(site.trim()).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("cannot be a base URL".to_string()))?
        .pop_if_empty()
        .extend(["api", "revalidate"]);
    Ok(url)
}
