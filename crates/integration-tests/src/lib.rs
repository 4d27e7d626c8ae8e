//! Test harness for Folio.
//!
//! [`MockBackend`] is an in-process stand-in for the CMS REST API. It keeps
//! records in memory, assigns numeric ids, resolves concurrent writes as
//! last-write-wins, and counts every request it receives so tests can check
//! that nothing was sent.
//!
//! # Example
//!
//! ```rust,ignore
//! let backend = MockBackend::start().await;
//! let client = backend.client();
//! let session = Session::in_memory();
//!
//! backend.login(&client, &session).await;
//! client.create(&session, Resource::Skills, &json!({"name": "Rust"})).await?;
//! ```

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use folio_client::{ApiClient, ClientConfig, Session};
use folio_core::Resource;
use folio_site::config::{ProfileConfig, SiteConfig};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{Value, json};

/// Credentials the mock backend accepts.
pub const ADMIN_EMAIL: &str = "owner@example.com";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

/// Token issued on a successful login.
pub const ADMIN_TOKEN: &str = "mock-token-7f3a";

/// Revalidation secret used by [`site_config`].
pub const REVALIDATION_SECRET: &str = "rv-7Kq2mX9pL4wZ8nB3";

type Records = BTreeMap<u64, Value>;

#[derive(Default)]
struct BackendState {
    collections: Mutex<HashMap<&'static str, Records>>,
    users: Mutex<Vec<Value>>,
    next_id: AtomicU64,
    requests: AtomicUsize,
}

impl BackendState {
    fn with_collection<T>(&self, resource: Resource, f: impl FnOnce(&mut Records) -> T) -> T {
        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(collections.entry(resource.path()).or_default())
    }

    fn assign_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// A running mock backend.
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<BackendState>,
}

impl MockBackend {
    /// Bind to an ephemeral local port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::expect_used)]
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());

        let api = Router::new()
            .route("/login", post(login))
            .route("/user", get(list_users).post(create_user))
            .route(
                "/{resource}",
                get(list_records).post(create_record).delete(delete_record),
            )
            .route("/{resource}/{id}", get(get_record).put(update_record));

        let app = Router::new()
            .nest("/api", api)
            .layer(axum::middleware::from_fn_with_state(
                Arc::clone(&state),
                count_requests,
            ))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Failed to read local address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    /// API base URL, e.g. `http://127.0.0.1:41234/api`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Client configuration pointing at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the base URL does not parse, which cannot happen for a
    /// bound socket address.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(5),
            ..ClientConfig::new(&self.base_url()).expect("valid mock URL")
        }
    }

    /// An API client for this backend.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.client_config()).expect("Failed to build API client")
    }

    /// Log `session` in with the accepted credentials.
    ///
    /// # Panics
    ///
    /// Panics if the login fails.
    #[allow(clippy::expect_used)]
    pub async fn login(&self, client: &ApiClient, session: &Session) {
        client
            .login(session, ADMIN_EMAIL, &SecretString::from(ADMIN_PASSWORD))
            .await
            .expect("mock login failed");
    }

    /// Insert a record directly, bypassing HTTP. Returns its id.
    pub fn seed(&self, resource: Resource, record: Value) -> String {
        let id = self.state.assign_id();
        let mut record = record;
        if let Value::Object(map) = &mut record {
            map.insert("id".to_string(), json!(id));
        }
        self.state.with_collection(resource, |records| {
            records.insert(id, record);
        });
        id.to_string()
    }

    /// Insert a user directly.
    pub fn seed_user(&self, name: &str, email: &str) {
        let id = self.state.assign_id();
        self.state
            .users
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(json!({ "id": id, "name": name, "email": email }));
    }

    /// The stored record, if any.
    #[must_use]
    pub fn record(&self, resource: Resource, id: &str) -> Option<Value> {
        let id = id.parse::<u64>().ok()?;
        self.state
            .with_collection(resource, |records| records.get(&id).cloned())
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }
}

/// Site configuration pointing at `backend`, with an HTTP base URL so
/// session cookies are not marked secure.
#[must_use]
pub fn site_config(backend: &MockBackend) -> SiteConfig {
    SiteConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        revalidation_secret: SecretString::from(REVALIDATION_SECRET),
        page_cache_ttl: Duration::from_secs(3600),
        api: backend.client_config(),
        profile: ProfileConfig::default(),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn count_requests(
    State(state): State<Arc<BackendState>>,
    request: Request,
    next: Next,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    next.run(request).await
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn login(Json(credentials): Json<Credentials>) -> Response {
    if credentials.email == ADMIN_EMAIL && credentials.password == ADMIN_PASSWORD {
        Json(json!({
            "token": ADMIN_TOKEN,
            "user": { "name": "Owner", "email": ADMIN_EMAIL }
        }))
        .into_response()
    } else {
        message(StatusCode::UNAUTHORIZED, "Invalid email or password")
    }
}

async fn list_users(State(state): State<Arc<BackendState>>) -> Json<Value> {
    let users = state
        .users
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .clone();
    Json(Value::Array(users))
}

async fn create_user(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    let (Some(name), Some(email)) = (
        body.get("name").and_then(Value::as_str),
        body.get("email").and_then(Value::as_str),
    ) else {
        return message(StatusCode::BAD_REQUEST, "name and email are required");
    };

    let user = json!({ "id": state.assign_id(), "name": name, "email": email });
    state
        .users
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .push(user.clone());
    (StatusCode::CREATED, Json(user)).into_response()
}

async fn list_records(
    State(state): State<Arc<BackendState>>,
    Path(resource): Path<String>,
) -> Response {
    let Some(resource) = parse_resource(&resource) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let records: Vec<Value> =
        state.with_collection(resource, |records| records.values().cloned().collect());
    Json(records).into_response()
}

async fn get_record(
    State(state): State<Arc<BackendState>>,
    Path((resource, id)): Path<(String, String)>,
) -> Response {
    let (Some(resource), Ok(id)) = (parse_resource(&resource), id.parse::<u64>()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match state.with_collection(resource, |records| records.get(&id).cloned()) {
        Some(record) => Json(record).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create_record(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(resource): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    let Some(resource) = parse_resource(&resource) else {
        return error(StatusCode::NOT_FOUND, "Unknown resource");
    };
    let Value::Object(mut record) = body else {
        return error(StatusCode::BAD_REQUEST, "Expected a JSON object");
    };

    let id = state.assign_id();
    record.insert("id".to_string(), json!(id));
    let record = Value::Object(record);
    state.with_collection(resource, |records| {
        records.insert(id, record.clone());
    });

    (StatusCode::CREATED, Json(record)).into_response()
}

async fn update_record(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path((resource, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let (Some(resource), Ok(id)) = (parse_resource(&resource), id.parse::<u64>()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Value::Object(mut record) = body else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    record.insert("id".to_string(), json!(id));
    let record = Value::Object(record);

    // Whole-record replace; the last write to arrive wins.
    let replaced = state.with_collection(resource, |records| {
        records
            .get_mut(&id)
            .map(|existing| *existing = record.clone())
            .is_some()
    });

    if replaced {
        Json(record).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

#[derive(Deserialize)]
struct IdQuery {
    id: Option<String>,
}

async fn delete_record(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(resource): Path<String>,
    Query(query): Query<IdQuery>,
) -> Response {
    if !authorized(&headers) {
        return message(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    let Some(resource) = parse_resource(&resource) else {
        return message(StatusCode::NOT_FOUND, "Unknown resource");
    };
    let Some(id) = query.id.and_then(|id| id.parse::<u64>().ok()) else {
        return message(StatusCode::BAD_REQUEST, "id is required");
    };

    match state.with_collection(resource, |records| records.remove(&id)) {
        Some(_) => message(StatusCode::OK, "Deleted"),
        None => message(StatusCode::NOT_FOUND, "Record not found"),
    }
}

fn parse_resource(raw: &str) -> Option<Resource> {
    raw.parse::<Resource>().ok().filter(|r| r.is_content())
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        == Some(ADMIN_TOKEN)
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn error(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "error": text }))).into_response()
}
