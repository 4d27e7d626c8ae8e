//! User entity (read-only from the site's point of view).

use serde::{Deserialize, Serialize};

use crate::models::{Entity, null_as_default};
use crate::types::{EntityId, Resource};

/// A backend user account.
///
/// The address is kept as the backend sends it, for display only. New
/// accounts go through a validated [`Email`](crate::Email) instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, alias = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

impl Entity for User {
    const RESOURCE: Resource = Resource::User;

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    fn label(&self) -> &str {
        &self.name
    }
}
