//! REST client for the portfolio backend.
//!
//! Resource operations map onto plain JSON-over-HTTP calls:
//!
//! | Operation          | Request                          |
//! |--------------------|----------------------------------|
//! | `fetch_collection` | `GET    {base}/{resource}`       |
//! | `fetch_by_id`      | `GET    {base}/{resource}/{id}`  |
//! | `create`           | `POST   {base}/{resource}`       |
//! | `update`           | `PUT    {base}/{resource}/{id}`  |
//! | `remove`           | `DELETE {base}/{resource}?id={id}` |
//! | `login`            | `POST   {base}/login`            |
//!
//! Each call reads the bearer token from the caller's [`Session`] at send
//! time. Nothing is retried.

use std::sync::Arc;

use folio_core::{Email, Entity, EntityId, Resource, User};
use reqwest::{RequestBuilder, Response, StatusCode, header};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::instrument;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::Session;

const LOGIN_PATH: &str = "login";
const USER_PATH: &str = "user";

/// Successful login reply.
#[derive(Debug)]
pub struct LoginResponse {
    /// Bearer token now stored in the session.
    pub token: SecretString,
    /// Full reply body, for callers that need fields beyond the token.
    pub body: Value,
}

/// Registration payload for `POST {base}/user`.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password: SecretString,
}

/// Client for the portfolio backend.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Which field of an error body carries the human-readable reason.
#[derive(Clone, Copy)]
enum ErrorField {
    /// `{"error": "..."}`, as returned by create.
    Error,
    /// `{"message": "..."}`, as returned by delete and login.
    Message,
    /// Ignore the body and report the status line.
    None,
}

impl ApiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::transport("build HTTP client", &e))?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Base URL every resource path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // Resource operations
    // =========================================================================

    /// Fetch every record of a resource.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::RequestFailed` on a non-success status or transport
    /// failure.
    #[instrument(skip(self, session), fields(resource = %resource))]
    pub async fn fetch_collection(
        &self,
        session: &Session,
        resource: Resource,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(&[resource.path()]);
        let action = format!("fetch {resource}");

        let response = self
            .send(self.authorize(self.inner.http.get(url), session), &action)
            .await?;
        read_json(response, &action, ErrorField::None).await
    }

    /// Fetch one record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidArgument` without sending anything if `id`
    /// is blank or malformed, otherwise as [`Self::fetch_collection`].
    #[instrument(skip(self, session), fields(resource = %resource))]
    pub async fn fetch_by_id(
        &self,
        session: &Session,
        resource: Resource,
        id: &str,
    ) -> Result<Value, ApiError> {
        let id = parse_id(id)?;
        let url = self.endpoint(&[resource.path(), id.as_str()]);
        let action = format!("fetch {resource}");

        let response = self
            .send(self.authorize(self.inner.http.get(url), session), &action)
            .await?;
        read_json(response, &action, ErrorField::None).await
    }

    /// Create a record. The backend assigns its id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::RequestFailed` carrying the backend's `error` field
    /// when it provides one.
    #[instrument(skip(self, session, payload), fields(resource = %resource))]
    pub async fn create(
        &self,
        session: &Session,
        resource: Resource,
        payload: &Value,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(&[resource.path()]);
        let action = format!("create {resource}");

        let request = self.authorize(self.inner.http.post(url).json(payload), session);
        let response = self.send(request, &action).await?;
        read_json(response, &action, ErrorField::Error).await
    }

    /// Replace a record's fields.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidArgument` for a blank id, otherwise
    /// `ApiError::RequestFailed` on failure.
    #[instrument(skip(self, session, payload), fields(resource = %resource))]
    pub async fn update(
        &self,
        session: &Session,
        resource: Resource,
        id: &str,
        payload: &Value,
    ) -> Result<Value, ApiError> {
        let id = parse_id(id)?;
        let url = self.endpoint(&[resource.path(), id.as_str()]);
        let action = format!("update {resource}");

        let request = self.authorize(self.inner.http.put(url).json(payload), session);
        let response = self.send(request, &action).await?;
        read_json(response, &action, ErrorField::None).await
    }

    /// Delete a record. The id travels as the `id` query parameter.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidArgument` for a blank id, otherwise
    /// `ApiError::RequestFailed` carrying the backend's `message` field when
    /// it provides one.
    #[instrument(skip(self, session), fields(resource = %resource))]
    pub async fn remove(
        &self,
        session: &Session,
        resource: Resource,
        id: &str,
    ) -> Result<Value, ApiError> {
        let id = parse_id(id)?;
        let mut url = self.endpoint(&[resource.path()]);
        url.query_pairs_mut().append_pair("id", id.as_str());
        let action = format!("delete {resource}");

        let response = self
            .send(self.authorize(self.inner.http.delete(url), session), &action)
            .await?;
        read_json(response, &action, ErrorField::Message).await
    }

    // =========================================================================
    // Typed helpers
    // =========================================================================

    /// Fetch every record of `E`'s resource, decoded.
    ///
    /// # Errors
    ///
    /// As [`Self::fetch_collection`], plus `RequestFailed` if the body is not
    /// a list of `E`.
    pub async fn list<E: Entity>(&self, session: &Session) -> Result<Vec<E>, ApiError> {
        let value = self.fetch_collection(session, E::RESOURCE).await?;
        decode(value, &format!("read {}", E::RESOURCE))
    }

    /// Fetch one record of `E`'s resource, decoded.
    ///
    /// # Errors
    ///
    /// As [`Self::fetch_by_id`].
    pub async fn get<E: Entity>(&self, session: &Session, id: &str) -> Result<E, ApiError> {
        let value = self.fetch_by_id(session, E::RESOURCE, id).await?;
        decode(value, &format!("read {}", E::RESOURCE))
    }

    /// Create `entity`. Any id it carries is dropped; the backend assigns one.
    ///
    /// # Errors
    ///
    /// As [`Self::create`].
    pub async fn create_entity<E: Entity>(
        &self,
        session: &Session,
        entity: &E,
    ) -> Result<Value, ApiError> {
        let mut payload = encode(entity)?;
        if let Value::Object(fields) = &mut payload {
            fields.remove("id");
        }
        self.create(session, E::RESOURCE, &payload).await
    }

    /// Update the record `entity` identifies.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidArgument` if `entity` has no id, otherwise
    /// as [`Self::update`].
    pub async fn update_entity<E: Entity>(
        &self,
        session: &Session,
        entity: &E,
    ) -> Result<Value, ApiError> {
        let id = entity
            .id()
            .ok_or_else(|| ApiError::InvalidArgument(format!("{} has no id", E::RESOURCE)))?;
        let payload = encode(entity)?;
        self.update(session, E::RESOURCE, id.as_str(), &payload).await
    }

    // =========================================================================
    // Authentication and users
    // =========================================================================

    /// Log in and persist the returned token into `session`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthFailed` with the backend's `message` (or
    /// `"Login failed"`) when the credentials are rejected or no token comes
    /// back, and `ApiError::Session` if the token cannot be stored.
    #[instrument(skip(self, session, password))]
    pub async fn login(
        &self,
        session: &Session,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let url = self.endpoint(&[LOGIN_PATH]);
        let body = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let response = self
            .send(self.inner.http.post(url).json(&body), "log in")
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = body_json(response).await;
            let message = field(&body, "message").unwrap_or_else(|| "Login failed".to_string());
            tracing::warn!(status = %status, "login rejected");
            return Err(ApiError::AuthFailed(message));
        }

        let body = body_json(response).await;
        let Some(token) = field(&body, "token").filter(|t| !t.is_empty()) else {
            return Err(ApiError::AuthFailed(
                "Login succeeded but no token was returned".to_string(),
            ));
        };

        session.establish(&token)?;
        tracing::info!("logged in");

        Ok(LoginResponse {
            token: SecretString::from(token),
            body,
        })
    }

    /// Forget the session's login. Nothing is sent to the backend.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Session` if the store cannot be written.
    pub fn logout(&self, session: &Session) -> Result<(), ApiError> {
        session.clear()?;
        tracing::info!("logged out");
        Ok(())
    }

    /// Fetch the user list. This route is public; no token is sent.
    ///
    /// A single object reply is treated as a one-element list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::RequestFailed` on failure or an unreadable body.
    #[instrument(skip(self))]
    pub async fn fetch_user(&self) -> Result<Vec<User>, ApiError> {
        let url = self.endpoint(&[USER_PATH]);
        let response = self.send(self.inner.http.get(url), "fetch user").await?;
        let value = read_json(response, "fetch user", ErrorField::None).await?;

        match value {
            Value::Array(_) => decode(value, "read user"),
            Value::Null => Ok(Vec::new()),
            single => decode(single, "read user").map(|user: User| vec![user]),
        }
    }

    /// Register a user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::RequestFailed` on failure.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn create_user(&self, user: &NewUser) -> Result<Value, ApiError> {
        let url = self.endpoint(&[USER_PATH]);
        let body = serde_json::json!({
            "name": user.name,
            "email": user.email.as_str(),
            "password": user.password.expose_secret(),
        });

        let response = self
            .send(self.inner.http.post(url).json(&body), "create user")
            .await?;
        read_json(response, "create user", ErrorField::None).await
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    /// `{base}/{segments...}`, with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorize(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        match session.token() {
            Some(token) => request.header(
                header::AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            ),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::transport(action, &e))?;
        tracing::debug!(status = %response.status(), "{action}");
        Ok(response)
    }
}

fn parse_id(id: &str) -> Result<EntityId, ApiError> {
    EntityId::parse(id).map_err(|e| ApiError::InvalidArgument(format!("id: {e}")))
}

fn encode<E: Entity>(entity: &E) -> Result<Value, ApiError> {
    serde_json::to_value(entity).map_err(|e| {
        ApiError::InvalidArgument(format!("{} payload: {e}", E::RESOURCE))
    })
}

fn decode<T: serde::de::DeserializeOwned>(value: Value, action: &str) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::RequestFailed {
        status: None,
        message: format!("Failed to {action}: unexpected response shape: {e}"),
    })
}

/// Body of a successful reply, or the failure built from an unsuccessful one.
/// An empty success body reads as `null`.
async fn read_json(
    response: Response,
    action: &str,
    error_field: ErrorField,
) -> Result<Value, ApiError> {
    let status = response.status();

    if !status.is_success() {
        let body = body_json(response).await;
        return Err(failure(status, action, &body, error_field));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::transport(action, &e))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&bytes).map_err(|e| ApiError::RequestFailed {
        status: Some(status),
        message: format!("Failed to {action}: invalid JSON response: {e}"),
    })
}

/// Best-effort JSON of an error body; `null` if it is empty or not JSON.
async fn body_json(response: Response) -> Value {
    match response.bytes().await {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        Err(_) => Value::Null,
    }
}

fn field(body: &Value, name: &str) -> Option<String> {
    body.get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn failure(status: StatusCode, action: &str, body: &Value, error_field: ErrorField) -> ApiError {
    let detail = match error_field {
        ErrorField::Error => field(body, "error"),
        ErrorField::Message => field(body, "message"),
        ErrorField::None => None,
    };

    ApiError::RequestFailed {
        status: Some(status),
        message: detail.unwrap_or_else(|| format!("Failed to {action}: {status}")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ClientConfig::new(base).unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let api = client("http://localhost:5000/api");
        assert_eq!(
            api.endpoint(&["skills"]).as_str(),
            "http://localhost:5000/api/skills"
        );
        assert_eq!(
            api.endpoint(&["skills", "7"]).as_str(),
            "http://localhost:5000/api/skills/7"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash_base() {
        let api = client("http://localhost:5000/api/");
        assert_eq!(
            api.endpoint(&["education"]).as_str(),
            "http://localhost:5000/api/education"
        );
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let api = client("http://localhost:5000/api");
        assert_eq!(
            api.endpoint(&["websites", "a b"]).as_str(),
            "http://localhost:5000/api/websites/a%20b"
        );
    }

    #[test]
    fn test_failure_prefers_body_field() {
        let body = serde_json::json!({ "error": "title is required" });
        let err = failure(StatusCode::BAD_REQUEST, "create websites", &body, ErrorField::Error);
        assert_eq!(err.to_string(), "title is required");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_failure_falls_back_to_status_line() {
        let err = failure(
            StatusCode::NOT_FOUND,
            "delete skills",
            &Value::Null,
            ErrorField::Message,
        );
        assert_eq!(err.to_string(), "Failed to delete skills: 404 Not Found");

        let body = serde_json::json!({ "error": "ignored" });
        let err = failure(StatusCode::NOT_FOUND, "fetch music", &body, ErrorField::None);
        assert_eq!(err.to_string(), "Failed to fetch music: 404 Not Found");
    }

    #[tokio::test]
    async fn test_blank_id_is_rejected_before_sending() {
        // Port 9 (discard) is never contacted; the call fails on the id first.
        let api = client("http://127.0.0.1:9/api");
        let session = Session::in_memory();

        for id in ["", "   "] {
            let err = api
                .fetch_by_id(&session, Resource::Skills, id)
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::InvalidArgument(_)), "{err:?}");
        }

        let err = api
            .update(&session, Resource::Websites, "", &Value::Null)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));

        let err = api
            .remove(&session, Resource::Education, "")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_update_entity_without_id() {
        let api = client("http://127.0.0.1:9/api");
        let skill = folio_core::Skill {
            id: None,
            name: "Rust".to_string(),
            description: String::new(),
            extra: serde_json::Map::new(),
        };

        let err = api
            .update_entity(&Session::in_memory(), &skill)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[test]
    fn test_logout_clears_session() {
        let api = client("http://localhost:5000/api");
        let session = Session::in_memory();
        session.establish("tok").unwrap();

        api.logout(&session).unwrap();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }
}
