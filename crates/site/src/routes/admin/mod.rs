//! Admin pages for managing portfolio content.
//!
//! Every handler here takes [`RequireSession`], so the session guard runs
//! before any backend call and anonymous visitors are sent to `/login`. The
//! backend still authorizes each call with the session's bearer token.

pub mod forms;

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use folio_client::ApiError;
use folio_core::Resource;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::content::{DEFAULT_PREVIEW_CHARS, render_truncated};
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireSession;
use crate::state::AppState;

use forms::FormField;

/// Keys tried, in order, for a record's list label.
const LABEL_KEYS: &[&str] = &["title", "name", "degree", "institution"];

/// Keys tried, in order, for a record's list summary.
const SUMMARY_KEYS: &[&str] = &["content", "description"];

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for flash-style messages after a redirect.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// View Types
// =============================================================================

/// A dashboard card.
#[derive(Debug, Clone)]
pub struct CategoryLink {
    pub title: &'static str,
    pub singular: &'static str,
    pub slug: &'static str,
}

impl From<Resource> for CategoryLink {
    fn from(resource: Resource) -> Self {
        Self {
            title: resource.title(),
            singular: resource.singular(),
            slug: resource.path(),
        }
    }
}

/// One record in a category list.
#[derive(Debug, Clone)]
pub struct RecordRow {
    pub id: Option<String>,
    pub label: String,
    pub summary_html: String,
    pub url: Option<String>,
}

impl RecordRow {
    fn from_value(record: &Value) -> Self {
        let text = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| record.get(*k).and_then(Value::as_str))
                .find(|s| !s.trim().is_empty())
                .map(str::to_owned)
        };

        let id = ["id", "ID"]
            .iter()
            .find_map(|k| record.get(*k))
            .and_then(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            });

        let summary = text(SUMMARY_KEYS).unwrap_or_default();
        let rendered = render_truncated(&summary, DEFAULT_PREVIEW_CHARS);

        Self {
            id,
            label: text(LABEL_KEYS).unwrap_or_else(|| "(untitled)".to_string()),
            summary_html: rendered.preview_html.unwrap_or(rendered.html),
            url: text(&["url"]),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub categories: Vec<CategoryLink>,
}

/// Category list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/list.html")]
pub struct ListTemplate {
    pub category: CategoryLink,
    pub rows: Vec<RecordRow>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Add/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/form.html")]
pub struct FormTemplate {
    pub category: CategoryLink,
    /// `Some(id)` when editing.
    pub editing: Option<String>,
    pub fields: Vec<FormField>,
    pub error: Option<String>,
}

impl FormTemplate {
    /// Form `action` URL.
    #[must_use]
    pub fn action(&self) -> String {
        match &self.editing {
            Some(id) => format!("/admin/{}/edit/{id}", self.category.slug),
            None => format!("/admin/{}/add", self.category.slug),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the admin dashboard.
pub async fn dashboard(RequireSession(_session): RequireSession) -> impl IntoResponse {
    DashboardTemplate {
        categories: Resource::CONTENT.into_iter().map(CategoryLink::from).collect(),
    }
}

/// List every record of a category.
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Path(category): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Result<Response, AppError> {
    let resource = content_resource(&category)?;

    let (rows, error) = match state.api().fetch_collection(&session, resource).await {
        Ok(Value::Array(records)) => (records.iter().map(RecordRow::from_value).collect(), None),
        Ok(Value::Null) => (Vec::new(), None),
        Ok(other) => {
            tracing::warn!(resource = %resource, kind = %json_kind(&other), "expected a list");
            (Vec::new(), Some("The backend returned an unexpected response.".to_string()))
        }
        Err(e) => {
            tracing::error!(resource = %resource, "Failed to fetch collection: {e}");
            (Vec::new(), Some(e.to_string()))
        }
    };

    Ok(ListTemplate {
        category: resource.into(),
        rows,
        error: error.or(query.error),
        success: query.success,
    }
    .into_response())
}

/// Display the add form.
pub async fn add_page(
    RequireSession(_session): RequireSession,
    Path(category): Path<String>,
) -> Result<Response, AppError> {
    let resource = content_resource(&category)?;

    Ok(FormTemplate {
        category: resource.into(),
        editing: None,
        fields: forms::blank(resource),
        error: None,
    }
    .into_response())
}

/// Handle the add form.
#[instrument(skip_all)]
pub async fn add(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Path(category): Path<String>,
    Form(submitted): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let resource = content_resource(&category)?;

    let body = match forms::payload(resource, &submitted, None) {
        Ok(body) => body,
        Err(rejected) => {
            return Ok(form_error(resource, None, rejected.fields, rejected.message));
        }
    };

    add_breadcrumb("admin", "Create record", Some(&[("resource", resource.path())]));

    match state
        .api()
        .create(&session, resource, &Value::Object(body))
        .await
    {
        Ok(_) => {
            tracing::info!(resource = %resource, "record created");
            Ok(redirect_with(resource, "success", &format!("{} created", resource.singular())))
        }
        Err(e @ ApiError::Session(_)) => Err(e.into()),
        Err(e) => {
            tracing::error!(resource = %resource, "Failed to create record: {e}");
            Ok(form_error(resource, None, echo(resource, &submitted), e.to_string()))
        }
    }
}

/// Display the edit form, filled from the backend record.
#[instrument(skip_all)]
pub async fn edit_page(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Path((category, id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let resource = content_resource(&category)?;
    let record = state.api().fetch_by_id(&session, resource, &id).await?;

    Ok(FormTemplate {
        category: resource.into(),
        fields: forms::prefill(resource, &record),
        editing: Some(id),
        error: None,
    }
    .into_response())
}

/// Handle the edit form.
///
/// The current record is fetched first and the form merged onto it, so
/// fields the form does not show survive the update. Concurrent edits are
/// last-write-wins at the backend.
#[instrument(skip_all)]
pub async fn edit(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Path((category, id)): Path<(String, String)>,
    Form(submitted): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let resource = content_resource(&category)?;
    let existing = state.api().fetch_by_id(&session, resource, &id).await?;

    let body = match forms::payload(resource, &submitted, Some(&existing)) {
        Ok(body) => body,
        Err(rejected) => {
            return Ok(form_error(resource, Some(id), rejected.fields, rejected.message));
        }
    };

    add_breadcrumb(
        "admin",
        "Update record",
        Some(&[("resource", resource.path()), ("id", &id)]),
    );

    match state
        .api()
        .update(&session, resource, &id, &Value::Object(body))
        .await
    {
        Ok(_) => {
            tracing::info!(resource = %resource, id = %id, "record updated");
            Ok(redirect_with(resource, "success", &format!("{} updated", resource.singular())))
        }
        Err(e @ (ApiError::Session(_) | ApiError::InvalidArgument(_))) => Err(e.into()),
        Err(e) => {
            tracing::error!(resource = %resource, id = %id, "Failed to update record: {e}");
            Ok(form_error(resource, Some(id), echo(resource, &submitted), e.to_string()))
        }
    }
}

/// Handle a delete button.
#[instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Path((category, id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let resource = content_resource(&category)?;

    add_breadcrumb(
        "admin",
        "Delete record",
        Some(&[("resource", resource.path()), ("id", &id)]),
    );

    match state.api().remove(&session, resource, &id).await {
        Ok(_) => {
            tracing::info!(resource = %resource, id = %id, "record deleted");
            Ok(redirect_with(resource, "success", &format!("{} deleted", resource.singular())))
        }
        Err(e) => {
            tracing::error!(resource = %resource, id = %id, "Failed to delete record: {e}");
            Ok(redirect_with(resource, "error", &e.to_string()))
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Parse a category path segment; only content resources are managed here.
fn content_resource(category: &str) -> Result<Resource, AppError> {
    category
        .parse::<Resource>()
        .ok()
        .filter(|r| r.is_content())
        .ok_or_else(|| AppError::NotFound(format!("category {category}")))
}

fn redirect_with(resource: Resource, key: &str, message: &str) -> Response {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(key, message)
        .finish();
    Redirect::to(&format!("/admin/{}?{query}", resource.path())).into_response()
}

fn form_error(
    resource: Resource,
    editing: Option<String>,
    fields: Vec<FormField>,
    message: String,
) -> Response {
    FormTemplate {
        category: resource.into(),
        editing,
        fields,
        error: Some(message),
    }
    .into_response()
}

/// The submitted values, for re-rendering after a backend rejection.
fn echo(resource: Resource, submitted: &HashMap<String, String>) -> Vec<FormField> {
    let record: serde_json::Map<String, Value> = submitted
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    forms::prefill(resource, &Value::Object(record))
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
