//! Portfolio entities exchanged with the backend.
//!
//! The backend owns the schema. These structs model the fields the site reads
//! and writes; anything else the backend returns is kept in `extra` so an
//! edit never drops data the client did not know about. Identifiers are read
//! from either `id` or `ID`, and a `null` text field reads as empty.

pub mod education;
pub mod showcase;
pub mod skill;
pub mod user;

pub use education::Education;
pub use showcase::{Contribution, MusicWork, Website};
pub use skill::Skill;
pub use user::User;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{EntityId, Resource};

/// A record type bound to one backend resource.
///
/// Lets callers write `client.list::<Skill>(..)` and have the endpoint
/// chosen by the type instead of a string.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The resource collection records of this type live in.
    const RESOURCE: Resource;

    /// Backend-assigned identifier, absent on records not yet created.
    fn id(&self) -> Option<&EntityId>;

    /// Short human-readable label for list views.
    fn label(&self) -> &str;
}

/// Deserialize a field, treating JSON `null` as the type's default.
///
/// Use with `#[serde(default, deserialize_with = "...")]` so missing and
/// `null` fields read the same.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
