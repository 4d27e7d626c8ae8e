//! Login, logout, and session status.
//!
//! # Usage
//!
//! ```bash
//! # Log in; the password is read from stdin
//! folio login -e owner@example.com
//! echo "$PASSWORD" | folio login -e owner@example.com
//!
//! folio status
//! folio logout
//! ```

use std::io::{BufRead, IsTerminal, Write};

use folio_client::GuardState;
use secrecy::SecretString;
use serde_json::{Value, json};

use super::{Context, emit};
use crate::error::CliError;

/// Log in and persist the token to the session file.
///
/// # Errors
///
/// Returns `CliError` if the password cannot be read or the backend rejects
/// the login.
pub async fn login(ctx: &Context, email: &str) -> Result<(), CliError> {
    let password = read_password()?;

    let response = ctx.client.login(&ctx.session, email.trim(), &password).await?;
    tracing::info!(email = %email.trim(), "logged in");

    emit(&redact_token(response.body))
}

/// Clear the stored session.
///
/// # Errors
///
/// Returns `CliError` if the session file cannot be written.
pub fn logout(ctx: &Context) -> Result<(), CliError> {
    ctx.client.logout(&ctx.session)?;
    emit(&json!({ "authenticated": false }))
}

/// Report whether the stored session passes the guard.
///
/// # Errors
///
/// Returns `CliError` if stdout cannot be written.
pub fn status(ctx: &Context) -> Result<(), CliError> {
    emit(&json!({
        "authenticated": is_logged_in(ctx),
        "api": ctx.client.base_url().as_str(),
    }))
}

/// Fail with [`CliError::NotLoggedIn`] unless the session guard passes.
///
/// # Errors
///
/// Returns `CliError::NotLoggedIn` when no login is stored.
pub fn require_login(ctx: &Context) -> Result<(), CliError> {
    if is_logged_in(ctx) {
        Ok(())
    } else {
        Err(CliError::NotLoggedIn)
    }
}

fn is_logged_in(ctx: &Context) -> bool {
    GuardState::Unchecked
        .check(Some(ctx.session.store()))
        .may_render()
}

/// Read one line from stdin, prompting when it is a terminal.
pub(crate) fn read_password() -> Result<SecretString, CliError> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        let mut err = std::io::stderr().lock();
        write!(err, "Password: ")?;
        err.flush()?;
    }

    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();

    Ok(SecretString::from(password))
}

/// The login reply with its token masked; the real token is only kept in the
/// session file.
fn redact_token(mut body: Value) -> Value {
    if let Some(token) = body.get_mut("token") {
        *token = Value::String("[redacted]".to_string());
    }
    body
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_token() {
        let body = redact_token(json!({ "token": "abc", "user": { "name": "Owner" } }));
        assert_eq!(body["token"], "[redacted]");
        assert_eq!(body["user"]["name"], "Owner");

        assert_eq!(redact_token(json!({ "ok": true })), json!({ "ok": true }));
    }
}
