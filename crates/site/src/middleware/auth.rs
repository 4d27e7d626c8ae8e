//! Admin session extractors.
//!
//! The browser only holds the session cookie. The login flag and backend
//! token live in the server-side session and are copied into a per-request
//! [`folio_client::Session`] that handlers pass to the API client.

use axum::{extract::FromRequestParts, http::request::Parts, response::Redirect};
use folio_client::session::keys;
use folio_client::{GuardState, LOGIN_ROUTE, MemoryStore as ClientStore, Session as ClientSession};
use tower_sessions::Session;

/// Extractor that runs the session guard.
///
/// Handlers taking this only run when the guard lands on
/// [`GuardState::Authenticated`]; otherwise the visitor is redirected to the
/// login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(RequireSession(session): RequireSession) -> impl IntoResponse {
///     // session carries the backend token for API calls
/// }
/// ```
pub struct RequireSession(pub ClientSession);

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let client = match parts.extensions.get::<Session>() {
            Some(server) => Some(load_login(server).await),
            None => None,
        };

        let guard = GuardState::Unchecked.check(client.as_ref().map(ClientSession::store));

        match client {
            Some(session) if guard.may_render() => Ok(Self(session)),
            _ => {
                tracing::debug!(path = %parts.uri.path(), "session guard redirecting");
                Err(Redirect::to(LOGIN_ROUTE))
            }
        }
    }
}

/// Extractor that yields the visitor's session without requiring a login.
///
/// Anonymous visitors get an empty session.
pub struct OptionalSession(pub ClientSession);

impl<S> FromRequestParts<S> for OptionalSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = match parts.extensions.get::<Session>() {
            Some(server) => load_login(server).await,
            None => ClientSession::in_memory(),
        };

        Ok(Self(session))
    }
}

/// Copy the login values from the server session into a request session.
async fn load_login(server: &Session) -> ClientSession {
    let mut values = Vec::with_capacity(2);
    for key in [keys::IS_AUTHENTICATED, keys::AUTH_TOKEN] {
        match server.get::<String>(key).await {
            Ok(Some(value)) => values.push((key, value)),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, key, "failed to read session value"),
        }
    }
    ClientSession::new(ClientStore::with_values(values))
}

/// Persist a successful login into the server session.
///
/// The session ID is cycled first so a pre-login cookie cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn remember_login(
    server: &Session,
    client: &ClientSession,
) -> Result<(), tower_sessions::session::Error> {
    server.cycle_id().await?;
    for key in [keys::AUTH_TOKEN, keys::IS_AUTHENTICATED] {
        if let Ok(Some(value)) = client.store().get(key) {
            server.insert(key, value).await?;
        }
    }
    Ok(())
}

/// Clear the login from the server session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn forget_login(server: &Session) -> Result<(), tower_sessions::session::Error> {
    server.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{Request, header};
    use axum::response::IntoResponse;

    use super::*;

    #[tokio::test]
    async fn test_anonymous_requests_redirect_to_login_on_every_path() {
        for uri in ["/admin", "/admin/skills", "/api/anything"] {
            let (mut parts, ()) = Request::get(uri).body(()).unwrap().into_parts();

            let Err(redirect) = RequireSession::from_request_parts(&mut parts, &()).await else {
                panic!("guard let an anonymous request through on {uri}");
            };
            let response = redirect.into_response();
            assert!(response.status().is_redirection(), "{uri}");
            assert_eq!(response.headers()[header::LOCATION], LOGIN_ROUTE, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_optional_session_is_empty_without_a_layer() {
        let (mut parts, ()) = Request::get("/").body(()).unwrap().into_parts();
        let OptionalSession(session) = OptionalSession::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(!session.is_authenticated());
    }
}
