//! User commands.
//!
//! # Usage
//!
//! ```bash
//! folio users
//! echo "$PASSWORD" | folio register -n "Owner" -e owner@example.com
//! ```

use folio_client::NewUser;
use folio_core::Email;

use super::auth::read_password;
use super::{Context, emit};
use crate::error::CliError;

/// Print every registered user.
///
/// # Errors
///
/// Returns `CliError` if the request fails.
pub async fn list(ctx: &Context) -> Result<(), CliError> {
    let users = ctx.client.fetch_user().await?;
    emit(&serde_json::to_value(users)?)
}

/// Register a user; the password is read from stdin.
///
/// # Errors
///
/// Returns `CliError` if the email is invalid or the request fails.
pub async fn register(ctx: &Context, name: &str, email: &str) -> Result<(), CliError> {
    let email = Email::parse(email).map_err(|e| CliError::InvalidEmail(e.to_string()))?;
    let user = NewUser {
        name: name.trim().to_string(),
        email,
        password: read_password()?,
    };

    let created = ctx.client.create_user(&user).await?;
    tracing::info!(email = %user.email, "user registered");
    emit(&created)
}
