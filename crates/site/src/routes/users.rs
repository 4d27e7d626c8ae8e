//! User list page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::state::AppState;

/// One row of the user list.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub name: String,
    pub email: String,
}

/// User list template.
#[derive(Template, WebTemplate)]
#[template(path = "users.html")]
pub struct UsersTemplate {
    pub owner_name: String,
    pub users: Vec<UserRow>,
    pub error: Option<String>,
}

/// Display every registered user.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let (users, error) = match state.api().fetch_user().await {
        Ok(users) => (
            users
                .into_iter()
                .map(|u| UserRow {
                    name: u.name,
                    email: u.email,
                })
                .collect(),
            None,
        ),
        Err(e) => {
            tracing::error!("Failed to fetch users: {e}");
            (Vec::new(), Some("Failed to load users.".to_string()))
        }
    };

    UsersTemplate {
        owner_name: state.config().profile.owner_name.clone(),
        users,
        error,
    }
}
