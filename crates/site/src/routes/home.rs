//! Home page route handler.
//!
//! The page is rendered from all five collections and cached until its TTL
//! passes or the revalidation webhook clears it. A page built while any
//! collection failed to load is served but not cached.

use std::sync::Arc;

use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use folio_client::{ApiError, Session};
use folio_core::{Contribution, Education, Entity, MusicWork, Skill, Website};
use tracing::instrument;

use crate::content::{
    DEFAULT_PREVIEW_CHARS, Rendered, SHORT_PREVIEW_CHARS, render_markdown, render_truncated,
};
use crate::error::AppError;
use crate::filters;
use crate::state::{AppState, PageKey};

// =============================================================================
// View Types
// =============================================================================

/// A website, music work, or contribution card.
#[derive(Debug, Clone)]
pub struct ShowcaseView {
    pub title: String,
    pub url: Option<String>,
    pub body: Rendered,
}

impl ShowcaseView {
    fn new(title: &str, content: &str, url: Option<&String>, preview_chars: usize) -> Self {
        Self {
            title: title.to_string(),
            url: url.filter(|u| !u.trim().is_empty()).cloned(),
            body: render_truncated(content, preview_chars),
        }
    }
}

impl From<&Website> for ShowcaseView {
    fn from(site: &Website) -> Self {
        Self::new(&site.title, &site.content, site.url.as_ref(), SHORT_PREVIEW_CHARS)
    }
}

impl From<&Contribution> for ShowcaseView {
    fn from(item: &Contribution) -> Self {
        Self::new(&item.title, &item.content, item.url.as_ref(), SHORT_PREVIEW_CHARS)
    }
}

impl From<&MusicWork> for ShowcaseView {
    fn from(work: &MusicWork) -> Self {
        Self::new(&work.title, &work.content, work.url.as_ref(), DEFAULT_PREVIEW_CHARS)
    }
}

/// A skill bubble with its markdown detail.
#[derive(Debug, Clone)]
pub struct SkillView {
    pub name: String,
    pub description_html: String,
}

impl From<&Skill> for SkillView {
    fn from(skill: &Skill) -> Self {
        Self {
            name: skill.name.clone(),
            description_html: render_markdown(&skill.description),
        }
    }
}

/// An education entry.
#[derive(Debug, Clone)]
pub struct EducationView {
    pub degree: String,
    pub institution: String,
    pub field_of_study: Option<String>,
    pub dates: String,
    pub body: Rendered,
}

impl From<&Education> for EducationView {
    fn from(edu: &Education) -> Self {
        Self {
            degree: edu.degree.clone(),
            institution: edu.institution.clone(),
            field_of_study: Some(edu.field_of_study.clone()).filter(|f| !f.trim().is_empty()),
            dates: edu.date_range(),
            body: render_truncated(&edu.description, DEFAULT_PREVIEW_CHARS),
        }
    }
}

// =============================================================================
// Template
// =============================================================================

/// Home page template.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub owner_name: String,
    pub tagline: String,
    pub skills: Vec<SkillView>,
    pub websites: Vec<ShowcaseView>,
    pub contributions: Vec<ShowcaseView>,
    pub education: Vec<EducationView>,
    pub music: Vec<ShowcaseView>,
}

// =============================================================================
// Handler
// =============================================================================

/// Display the home page.
#[instrument(skip_all)]
pub async fn home(State(state): State<AppState>) -> Result<Response, AppError> {
    if let Some(html) = state.cached_page(PageKey::Home).await {
        tracing::debug!("home page served from cache");
        return Ok(Html(html.to_string()).into_response());
    }

    // Public content; no token is sent.
    let session = Session::in_memory();
    let api = state.api();

    let (websites, music, contributions, skills, education) = tokio::join!(
        api.list::<Website>(&session),
        api.list::<MusicWork>(&session),
        api.list::<Contribution>(&session),
        api.list::<Skill>(&session),
        api.list::<Education>(&session),
    );

    let complete = websites.is_ok()
        && music.is_ok()
        && contributions.is_ok()
        && skills.is_ok()
        && education.is_ok();

    let profile = &state.config().profile;
    let template = HomeTemplate {
        owner_name: profile.owner_name.clone(),
        tagline: profile.tagline.clone(),
        skills: views(&or_empty(skills)),
        websites: views(&or_empty(websites)),
        contributions: views(&or_empty(contributions)),
        education: views(&or_empty(education)),
        music: views(&or_empty(music)),
    };

    let html: Arc<str> = template
        .render()
        .map_err(|e| AppError::Internal(format!("Failed to render home page: {e}")))?
        .into();

    if complete {
        state.cache_page(PageKey::Home, Arc::clone(&html)).await;
    } else {
        tracing::warn!("home page rendered with missing sections; not caching");
    }

    Ok(Html(html.to_string()).into_response())
}

/// A collection, or an empty one if it failed to load.
fn or_empty<E: Entity>(result: Result<Vec<E>, ApiError>) -> Vec<E> {
    result.unwrap_or_else(|e| {
        tracing::error!(resource = %E::RESOURCE, "Failed to fetch collection: {e}");
        Vec::new()
    })
}

fn views<E, V>(items: &[E]) -> Vec<V>
where
    V: for<'a> From<&'a E>,
{
    items.iter().map(V::from).collect()
}
