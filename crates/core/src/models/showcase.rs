//! Showcase entries: websites, music works, and contributions.
//!
//! All three share one shape (a titled markdown write-up with a link), so
//! they are generated by `define_showcase!`.

/// Define a showcase entity bound to a resource.
///
/// Creates a struct with:
/// - `id`, `title`, `content` (markdown), `url`, `description`
/// - an `extra` map preserving unmodelled backend fields
/// - an [`Entity`](crate::Entity) implementation for the given resource
macro_rules! define_showcase {
    ($(#[$meta:meta])* $name:ident => $resource:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            /// Backend-assigned identifier.
            #[serde(default, alias = "ID", skip_serializing_if = "Option::is_none")]
            pub id: Option<$crate::EntityId>,
            /// Display title.
            #[serde(default, deserialize_with = "crate::models::null_as_default")]
            pub title: String,
            /// Markdown body.
            #[serde(default, deserialize_with = "crate::models::null_as_default")]
            pub content: String,
            /// External link.
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub url: Option<String>,
            /// Plain-text summary.
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub description: Option<String>,
            /// Fields returned by the backend that are not modelled here.
            #[serde(flatten)]
            pub extra: ::serde_json::Map<String, ::serde_json::Value>,
        }

        impl $crate::Entity for $name {
            const RESOURCE: $crate::Resource = $resource;

            fn id(&self) -> Option<&$crate::EntityId> {
                self.id.as_ref()
            }

            fn label(&self) -> &str {
                &self.title
            }
        }
    };
}

define_showcase!(
    /// A website built and shown in the portfolio.
    Website => crate::Resource::Websites
);

define_showcase!(
    /// A published music work.
    MusicWork => crate::Resource::Music
);

define_showcase!(
    /// A contribution to someone else's project.
    Contribution => crate::Resource::Contributions
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{Entity, EntityId, Resource};

    #[test]
    fn test_resource_binding() {
        assert_eq!(Website::RESOURCE, Resource::Websites);
        assert_eq!(MusicWork::RESOURCE, Resource::Music);
        assert_eq!(Contribution::RESOURCE, Resource::Contributions);
    }

    #[test]
    fn test_unknown_fields_survive_a_round_trip() {
        let raw = json!({
            "id": 3,
            "title": "Folio",
            "content": "# Hello",
            "url": "https://example.com",
            "createdAt": "2024-05-01T10:00:00Z"
        });

        let site: Website = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(site.id, Some(EntityId::from(3)));
        assert_eq!(site.label(), "Folio");
        assert_eq!(site.extra.get("createdAt"), raw.get("createdAt"));
        assert_eq!(serde_json::to_value(&site).unwrap(), raw);
    }

    #[test]
    fn test_uppercase_id_key_is_accepted() {
        let site: Website = serde_json::from_value(json!({ "ID": 12, "title": "Go" })).unwrap();
        assert_eq!(site.id, Some(EntityId::from(12)));
        assert_eq!(serde_json::to_value(&site).unwrap()["id"], json!(12));
    }

    #[test]
    fn test_missing_fields_default() {
        let work: MusicWork = serde_json::from_value(json!({ "id": "a1" })).unwrap();
        assert_eq!(work.title, "");
        assert_eq!(work.content, "");
        assert!(work.url.is_none());
    }

    #[test]
    fn test_null_text_fields_read_as_empty() {
        let sites: Vec<Website> = serde_json::from_value(json!([
            { "id": 1, "title": "Folio", "content": "Hello" },
            { "id": 2, "title": null, "content": null, "url": null, "description": null }
        ]))
        .unwrap();

        assert_eq!(sites.len(), 2);
        assert_eq!(sites[1].title, "");
        assert_eq!(sites[1].content, "");
        assert!(sites[1].url.is_none());
    }

    #[test]
    fn test_new_record_serializes_without_id() {
        let contribution = Contribution {
            title: "Patch".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&contribution).unwrap();
        assert!(value.get("id").is_none());
    }
}
