//! Folio client - data access for the portfolio backend.
//!
//! Two pieces live here:
//!
//! - [`ApiClient`] - translates resource operations (`fetch_collection`,
//!   `fetch_by_id`, `create`, `update`, `remove`, `login`) into HTTP calls
//!   against the backend REST API.
//! - [`guard`] - the session guard that decides whether admin pages may
//!   render or must redirect to the login route.
//!
//! Every API call takes a [`Session`] explicitly. The session reads its token
//! from its [`SessionStore`] on each call, so a login or logout is visible to
//! the very next request without any in-memory caching.
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_client::{ApiClient, ClientConfig, Session};
//! use folio_core::{Resource, Skill};
//!
//! let client = ApiClient::new(&ClientConfig::from_env()?)?;
//! let session = Session::in_memory();
//!
//! client.login(&session, &email, &password).await?;
//! let skills: Vec<Skill> = client.list(&session).await?;
//! client.remove(&session, Resource::Skills, "42").await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod error;
pub mod guard;
pub mod session;

pub use client::{ApiClient, LoginResponse, NewUser};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use guard::{GuardState, LOGIN_ROUTE, is_authenticated};
pub use session::{FileStore, MemoryStore, Session, SessionStore, StoreError};
