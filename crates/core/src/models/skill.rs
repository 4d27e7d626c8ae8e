//! Skill entity.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{Entity, null_as_default};
use crate::types::{EntityId, Resource};

/// A skill shown as a bubble on the home page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(default, alias = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Markdown detail shown when the bubble is opened.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Skill {
    const RESOURCE: Resource = Resource::Skills;

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    fn label(&self) -> &str {
        &self.name
    }
}
