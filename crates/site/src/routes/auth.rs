//! Login and logout handlers.
//!
//! Credentials go to the backend login endpoint. On success the returned
//! token is kept in the server-side session; the browser only gets the
//! session cookie.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use folio_client::{ApiError, Session as ClientSession};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{OptionalSession, forget_login, remember_login};
use crate::state::AppState;

/// Where a successful login lands.
const AFTER_LOGIN: &str = "/admin";

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for message display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub owner_name: String,
    pub email: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the login page. Visitors already logged in go straight to the
/// dashboard.
pub async fn login_page(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    Query(query): Query<MessageQuery>,
) -> Response {
    if session.is_authenticated() {
        return Redirect::to(AFTER_LOGIN).into_response();
    }

    LoginTemplate {
        owner_name: state.config().profile.owner_name.clone(),
        email: String::new(),
        error: query.error,
        success: query.success,
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    server: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let client = ClientSession::in_memory();
    let password = SecretString::from(form.password);

    match state
        .api()
        .login(&client, form.email.trim(), &password)
        .await
    {
        Ok(_) => {
            remember_login(&server, &client).await?;
            tracing::info!("admin logged in");
            Ok(Redirect::to(AFTER_LOGIN).into_response())
        }
        Err(ApiError::AuthFailed(message)) => {
            tracing::warn!("login rejected: {message}");
            Ok(LoginTemplate {
                owner_name: state.config().profile.owner_name.clone(),
                email: form.email,
                error: Some(message),
                success: None,
            }
            .into_response())
        }
        Err(e) => {
            tracing::error!("login failed: {e}");
            Ok(LoginTemplate {
                owner_name: state.config().profile.owner_name.clone(),
                email: form.email,
                error: Some("Login failed. Please try again.".to_string()),
                success: None,
            }
            .into_response())
        }
    }
}

/// Handle logout.
#[instrument(skip_all)]
pub async fn logout(server: Session) -> Result<Redirect, AppError> {
    forget_login(&server).await?;
    tracing::info!("admin logged out");
    Ok(Redirect::to("/login?success=Logged+out"))
}
