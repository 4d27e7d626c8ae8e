//! HTTP route handlers for the portfolio site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                - Home page (cached)
//! GET  /health                          - Health check
//! GET  /users                           - Registered users
//!
//! # Auth
//! GET  /login                           - Login page
//! POST /login                           - Login action
//! POST /logout                          - Logout action
//!
//! # Admin (requires login)
//! GET  /admin                           - Dashboard
//! GET  /admin/{category}                - Records of a category
//! GET  /admin/{category}/add            - Add form
//! POST /admin/{category}/add            - Create record
//! GET  /admin/{category}/edit/{id}      - Edit form
//! POST /admin/{category}/edit/{id}      - Update record
//! POST /admin/{category}/delete/{id}    - Delete record
//!
//! # API
//! POST /api/revalidate                  - Clear cached pages
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod home;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard))
        .route("/{category}", get(admin::list))
        .route("/{category}/add", get(admin::add_page).post(admin::add))
        .route(
            "/{category}/edit/{id}",
            get(admin::edit_page).post(admin::edit),
        )
        .route("/{category}/delete/{id}", post(admin::delete))
}

/// Create the API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/revalidate", post(api::revalidate::revalidate))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        .route("/users", get(users::index))
        // Auth routes
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        // Admin routes
        .nest("/admin", admin_routes())
        // Webhooks
        .nest("/api", api_routes())
}
