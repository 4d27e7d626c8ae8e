//! Resource commands: list, get, create, update, delete.
//!
//! # Usage
//!
//! ```bash
//! folio list skills
//! folio get education 3
//! folio create websites --data '{"title":"Folio","content":"# Hi","url":"https://example.com"}'
//! folio update skills 4 --data '{"name":"Rust","description":"Systems"}'
//! folio delete music 9
//! ```

use folio_core::Resource;
use serde_json::{Value, json};

use super::auth::require_login;
use super::{Context, emit};
use crate::error::CliError;

/// Print every record of `resource`.
///
/// # Errors
///
/// Returns `CliError` if the request fails.
pub async fn list(ctx: &Context, resource: Resource) -> Result<(), CliError> {
    let records = ctx.client.fetch_collection(&ctx.session, resource).await?;
    emit(&records)
}

/// Print one record.
///
/// # Errors
///
/// Returns `CliError` if `id` is blank or the request fails.
pub async fn get(ctx: &Context, resource: Resource, id: &str) -> Result<(), CliError> {
    let record = ctx.client.fetch_by_id(&ctx.session, resource, id).await?;
    emit(&record)
}

/// Create a record from a JSON object.
///
/// # Errors
///
/// Returns `CliError` if not logged in, `data` is not a JSON object, or the
/// request fails.
pub async fn create(ctx: &Context, resource: Resource, data: &str) -> Result<(), CliError> {
    require_login(ctx)?;
    let body = parse_data(data)?;

    let created = ctx.client.create(&ctx.session, resource, &body).await?;
    tracing::info!(resource = %resource, "record created");
    emit(&created)
}

/// Replace a record with a JSON object.
///
/// # Errors
///
/// Returns `CliError` if not logged in, `data` is not a JSON object, or the
/// request fails.
pub async fn update(
    ctx: &Context,
    resource: Resource,
    id: &str,
    data: &str,
) -> Result<(), CliError> {
    require_login(ctx)?;
    let body = parse_data(data)?;

    let updated = ctx.client.update(&ctx.session, resource, id, &body).await?;
    tracing::info!(resource = %resource, id, "record updated");
    emit(&updated)
}

/// Delete a record.
///
/// # Errors
///
/// Returns `CliError` if not logged in or the request fails.
pub async fn delete(ctx: &Context, resource: Resource, id: &str) -> Result<(), CliError> {
    require_login(ctx)?;

    let reply = ctx.client.remove(&ctx.session, resource, id).await?;
    tracing::info!(resource = %resource, id, "record deleted");
    emit(&if reply.is_null() {
        json!({ "deleted": id })
    } else {
        reply
    })
}

fn parse_data(data: &str) -> Result<Value, CliError> {
    let value: Value = serde_json::from_str(data).map_err(CliError::InvalidData)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(CliError::DataNotObject)
    }
}
