//! Site router tests: webhook, page cache, session guard, and admin flows.
//!
//! Requests go straight into the router with `oneshot`; the router talks to
//! the mock backend over a real local socket.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use folio_core::Resource;
use folio_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, MockBackend, REVALIDATION_SECRET, site_config,
};
use folio_site::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn site(backend: &MockBackend) -> Router {
    folio_site::app(AppState::new(site_config(backend)).unwrap())
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded",
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

/// `name=value` of the session cookie set by `response`.
fn session_cookie(response: &Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

fn login_form() -> String {
    format!("email={}&password={}", ADMIN_EMAIL, ADMIN_PASSWORD.replace(' ', "+"))
}

async fn logged_in(app: &Router) -> String {
    let response = send(app, post_form("/login", &login_form(), None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");
    session_cookie(&response)
}

// =============================================================================
// Health & headers
// =============================================================================

#[tokio::test]
async fn test_health_and_security_headers() {
    let backend = MockBackend::start().await;
    let app = site(&backend).await;

    let response = send(&app, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_text(response).await, "ok");
}

// =============================================================================
// Revalidation webhook
// =============================================================================

#[tokio::test]
async fn test_revalidate_rejects_wrong_or_missing_secret() {
    let backend = MockBackend::start().await;
    let app = site(&backend).await;

    let response = send(
        &app,
        post_json("/api/revalidate", &json!({ "secret": "not-the-secret" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body, json!({ "message": "Invalid secret" }));

    let response = send(&app, Request::post("/api/revalidate").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_revalidate_accepts_matching_secret() {
    let backend = MockBackend::start().await;
    let app = site(&backend).await;

    let response = send(
        &app,
        post_json("/api/revalidate", &json!({ "secret": REVALIDATION_SECRET })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["revalidated"], true);
    assert!(body["now"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_home_is_cached_until_revalidated() {
    let backend = MockBackend::start().await;
    let app = site(&backend).await;
    backend.seed(Resource::Websites, json!({ "title": "Alpha", "content": "first" }));

    let html = body_text(send(&app, get("/", None)).await).await;
    assert!(html.contains("Alpha"));
    assert!(html.contains("Websites"));
    assert!(html.contains("Music Work"));

    backend.seed(Resource::Websites, json!({ "title": "Beta", "content": "second" }));
    let requests = backend.requests();

    let html = body_text(send(&app, get("/", None)).await).await;
    assert!(!html.contains("Beta"));
    assert_eq!(backend.requests(), requests, "cached page hit the backend");

    let response = send(
        &app,
        post_json("/api/revalidate", &json!({ "secret": REVALIDATION_SECRET })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(send(&app, get("/", None)).await).await;
    assert!(html.contains("Beta"));
}

#[tokio::test]
async fn test_home_renders_records_with_null_fields() {
    let backend = MockBackend::start().await;
    let app = site(&backend).await;
    backend.seed(Resource::Skills, json!({ "name": "Rust", "description": "Systems" }));
    backend.seed(Resource::Skills, json!({ "name": "Golang", "description": null }));
    backend.seed(Resource::Websites, json!({ "title": "Alpha", "content": null }));

    let html = body_text(send(&app, get("/", None)).await).await;
    assert!(html.contains("Rust"));
    assert!(html.contains("Golang"));
    assert!(html.contains("Alpha"));

    let requests = backend.requests();
    let html = body_text(send(&app, get("/", None)).await).await;
    assert!(html.contains("Golang"));
    assert_eq!(backend.requests(), requests, "page with null fields was not cached");
}

// =============================================================================
// Session guard
// =============================================================================

#[tokio::test]
async fn test_admin_pages_redirect_without_login() {
    let backend = MockBackend::start().await;
    let app = site(&backend).await;
    let requests = backend.requests();

    for uri in ["/admin", "/admin/skills", "/admin/skills/add", "/admin/skills/edit/1"] {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/login", "{uri}");
    }

    let response = send(&app, post_form("/admin/skills/delete/1", "", None)).await;
    assert_eq!(location(&response), "/login");

    // The guard decides before any backend call.
    assert_eq!(backend.requests(), requests);
}

#[tokio::test]
async fn test_rejected_login_shows_backend_message() {
    let backend = MockBackend::start().await;
    let app = site(&backend).await;

    let response = send(
        &app,
        post_form("/login", &format!("email={ADMIN_EMAIL}&password=nope"), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Invalid email or password"));
}

#[tokio::test]
async fn test_login_then_logout() {
    let backend = MockBackend::start().await;
    let app = site(&backend).await;
    let cookie = logged_in(&app).await;

    let response = send(&app, get("/admin", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Admin Dashboard"));
    assert!(html.contains("Manage Skills"));

    // Already logged in: the login page forwards to the dashboard.
    let response = send(&app, get("/login", Some(&cookie))).await;
    assert_eq!(location(&response), "/admin");

    let response = send(&app, post_form("/logout", "", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = send(&app, get("/admin", Some(&cookie))).await;
    assert_eq!(location(&response), "/login");
}

// =============================================================================
// Admin content management
// =============================================================================

#[tokio::test]
async fn test_admin_create_edit_delete() {
    let backend = MockBackend::start().await;
    let app = site(&backend).await;
    let cookie = logged_in(&app).await;

    // Create
    let response = send(
        &app,
        post_form(
            "/admin/skills/add",
            "name=Rust&description=Systems+programming",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/admin/skills?success="));

    let html = body_text(send(&app, get("/admin/skills", Some(&cookie))).await).await;
    assert!(html.contains("Rust"));
    assert!(html.contains("Systems programming"));

    let id = "1";
    assert_eq!(backend.record(Resource::Skills, id).unwrap()["name"], "Rust");

    // Edit form is filled from the backend
    let html = body_text(send(&app, get("/admin/skills/edit/1", Some(&cookie))).await).await;
    assert!(html.contains(r#"value="Rust""#));

    let response = send(
        &app,
        post_form("/admin/skills/edit/1", "name=Rust&description=", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let stored = backend.record(Resource::Skills, id).unwrap();
    assert_eq!(stored["name"], "Rust");
    assert!(stored.get("description").is_none());

    // Delete
    let response = send(&app, post_form("/admin/skills/delete/1", "", Some(&cookie))).await;
    assert!(location(&response).starts_with("/admin/skills?success="));
    assert!(backend.record(Resource::Skills, id).is_none());

    // Deleting again reports the backend's message
    let response = send(&app, post_form("/admin/skills/delete/1", "", Some(&cookie))).await;
    assert_eq!(
        location(&response),
        "/admin/skills?error=Record+not+found"
    );
}

#[tokio::test]
async fn test_admin_form_requires_fields() {
    let backend = MockBackend::start().await;
    let app = site(&backend).await;
    let cookie = logged_in(&app).await;
    let requests = backend.requests();

    let response = send(
        &app,
        post_form("/admin/education/add", "institution=State+U&degree=", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Required: Degree"));
    assert!(html.contains(r#"value="State U""#));
    assert_eq!(backend.requests(), requests);
}

#[tokio::test]
async fn test_admin_unknown_category_is_not_found() {
    let backend = MockBackend::start().await;
    let app = site(&backend).await;
    let cookie = logged_in(&app).await;

    let response = send(&app, get("/admin/posts", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Older links use `music-works`.
    let response = send(&app, get("/admin/music-works", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_users_page_lists_users() {
    let backend = MockBackend::start().await;
    backend.seed_user("Owner", ADMIN_EMAIL);
    let app = site(&backend).await;

    let html = body_text(send(&app, get("/users", None)).await).await;
    assert!(html.contains("Owner"));
    assert!(html.contains(ADMIN_EMAIL));
}
