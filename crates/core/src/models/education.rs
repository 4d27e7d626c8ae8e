//! Education entity.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{Entity, null_as_default};
use crate::types::{EntityId, Resource};

/// A degree or course of study.
///
/// Dates are kept as the backend sends them. Some backends answer in
/// `snake_case`, so `start_date`, `end_date`, and `field_of_study` are
/// accepted on input; output is always `camelCase`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default, alias = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(default, alias = "field_of_study", deserialize_with = "null_as_default")]
    pub field_of_study: String,
    #[serde(default, alias = "start_date", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Absent while still enrolled.
    #[serde(default, alias = "end_date", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Education {
    /// Human-readable date range, e.g. `2016-09-01 - 2020-06-30` or
    /// `2021-01-15 - Present`. Time components of ISO timestamps are dropped.
    #[must_use]
    pub fn date_range(&self) -> String {
        let start = self.start_date.as_deref().map(date_part).unwrap_or_default();
        let end = self
            .end_date
            .as_deref()
            .map(date_part)
            .filter(|d| !d.is_empty())
            .unwrap_or("Present");
        format!("{start} - {end}")
    }
}

fn date_part(value: &str) -> &str {
    value.split_once('T').map_or(value, |(date, _)| date).trim()
}

impl Entity for Education {
    const RESOURCE: Resource = Resource::Education;

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    fn label(&self) -> &str {
        &self.degree
    }
}
