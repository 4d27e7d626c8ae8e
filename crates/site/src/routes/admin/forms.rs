//! Admin form definitions.
//!
//! Each content resource has a fixed list of fields. Submitted forms are
//! turned into JSON payloads: required fields must be non-blank, blank
//! optional fields are left out of new records and removed from edited ones.

use std::collections::HashMap;

use folio_core::Resource;
use serde_json::{Map, Value};

/// How a field is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Url,
    Date,
    /// Plain multi-line text.
    TextArea,
    /// Multi-line markdown.
    Markdown,
}

/// Static description of one form field.
#[derive(Debug)]
pub struct FieldSpec {
    /// JSON key in the payload.
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Other keys the backend may use for the same value.
    pub aliases: &'static [&'static str],
}

const fn field(
    name: &'static str,
    label: &'static str,
    kind: FieldKind,
    required: bool,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required,
        aliases: &[],
    }
}

const SHOWCASE_FIELDS: &[FieldSpec] = &[
    field("title", "Title", FieldKind::Text, true),
    field("description", "Description", FieldKind::TextArea, false),
    field("url", "URL", FieldKind::Url, false),
    field("content", "Content", FieldKind::Markdown, false),
];

const SKILL_FIELDS: &[FieldSpec] = &[
    field("name", "Skill Name", FieldKind::Text, true),
    field("description", "Skill Description", FieldKind::Markdown, false),
];

const EDUCATION_FIELDS: &[FieldSpec] = &[
    field("institution", "Institution", FieldKind::Text, true),
    field("degree", "Degree", FieldKind::Text, true),
    FieldSpec {
        aliases: &["field_of_study"],
        ..field("fieldOfStudy", "Field of Study", FieldKind::Text, false)
    },
    FieldSpec {
        aliases: &["start_date"],
        ..field("startDate", "Start Date", FieldKind::Date, false)
    },
    FieldSpec {
        aliases: &["end_date"],
        ..field("endDate", "End Date", FieldKind::Date, false)
    },
    field("description", "Description", FieldKind::Markdown, false),
];

/// Fields shown on the add/edit form of `resource`.
#[must_use]
pub const fn fields(resource: Resource) -> &'static [FieldSpec] {
    match resource {
        Resource::Websites | Resource::Music | Resource::Contributions => SHOWCASE_FIELDS,
        Resource::Skills => SKILL_FIELDS,
        Resource::Education => EDUCATION_FIELDS,
        Resource::User => &[],
    }
}

/// A field ready for rendering, with its current value.
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
}

impl FormField {
    fn new(spec: &FieldSpec, value: String) -> Self {
        Self {
            name: spec.name,
            label: spec.label,
            kind: spec.kind,
            required: spec.required,
            value,
        }
    }

    /// Whether the field renders as a `<textarea>`.
    #[must_use]
    pub fn is_multiline(&self) -> bool {
        matches!(self.kind, FieldKind::TextArea | FieldKind::Markdown)
    }

    /// Whether the field holds markdown.
    #[must_use]
    pub fn is_markdown(&self) -> bool {
        self.kind == FieldKind::Markdown
    }

    /// `type` attribute for single-line inputs.
    #[must_use]
    pub const fn input_type(&self) -> &'static str {
        match self.kind {
            FieldKind::Url => "url",
            FieldKind::Date => "date",
            FieldKind::Text | FieldKind::TextArea | FieldKind::Markdown => "text",
        }
    }
}

/// A submitted form that failed validation.
#[derive(Debug)]
pub struct FormRejected {
    pub message: String,
    /// The fields as submitted, for re-rendering.
    pub fields: Vec<FormField>,
}

/// Blank fields for the add form.
#[must_use]
pub fn blank(resource: Resource) -> Vec<FormField> {
    fields(resource)
        .iter()
        .map(|spec| FormField::new(spec, String::new()))
        .collect()
}

/// Fields filled from an existing record.
#[must_use]
pub fn prefill(resource: Resource, record: &Value) -> Vec<FormField> {
    fields(resource)
        .iter()
        .map(|spec| {
            let value = lookup(record, spec).map(display_value).unwrap_or_default();
            let value = if spec.kind == FieldKind::Date {
                date_only(&value).to_string()
            } else {
                value
            };
            FormField::new(spec, value)
        })
        .collect()
}

/// Build the JSON payload from a submitted form.
///
/// With `existing`, the submitted fields are merged onto that record so
/// fields the form does not show are preserved; `id` is never sent in the
/// body.
///
/// # Errors
///
/// Returns [`FormRejected`] naming the required fields left blank.
pub fn payload(
    resource: Resource,
    submitted: &HashMap<String, String>,
    existing: Option<&Value>,
) -> Result<Map<String, Value>, FormRejected> {
    let specs = fields(resource);
    let mut body = match existing {
        Some(Value::Object(record)) => record.clone(),
        _ => Map::new(),
    };
    body.remove("id");
    body.remove("ID");

    let mut missing = Vec::new();
    let mut echoed = Vec::with_capacity(specs.len());

    for spec in specs {
        let raw = submitted.get(spec.name).map_or("", String::as_str);
        let value = if spec.kind == FieldKind::Markdown {
            raw.trim_end()
        } else {
            raw.trim()
        };
        echoed.push(FormField::new(spec, raw.to_string()));

        for alias in spec.aliases {
            body.remove(*alias);
        }

        if value.is_empty() {
            if spec.required {
                missing.push(spec.label);
            }
            body.remove(spec.name);
        } else {
            body.insert(spec.name.to_string(), Value::String(value.to_string()));
        }
    }

    if missing.is_empty() {
        Ok(body)
    } else {
        Err(FormRejected {
            message: format!("Required: {}", missing.join(", ")),
            fields: echoed,
        })
    }
}

fn lookup<'a>(record: &'a Value, spec: &FieldSpec) -> Option<&'a Value> {
    std::iter::once(&spec.name)
        .chain(spec.aliases)
        .find_map(|key| record.get(*key).filter(|v| !v.is_null()))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// `2020-09-01T00:00:00Z` → `2020-09-01`, as `<input type="date">` expects.
fn date_only(value: &str) -> &str {
    value.split_once('T').map_or(value, |(date, _)| date)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_every_content_resource_has_fields() {
        for resource in Resource::CONTENT {
            assert!(!fields(resource).is_empty(), "{resource}");
        }
        assert!(fields(Resource::User).is_empty());
    }

    #[test]
    fn test_payload_omits_blank_optional_fields() {
        let submitted = form(&[("title", " Folio "), ("url", ""), ("content", "# Hi\n\n")]);
        let body = payload(Resource::Websites, &submitted, None).unwrap();

        assert_eq!(body.get("title"), Some(&json!("Folio")));
        assert_eq!(body.get("content"), Some(&json!("# Hi")));
        assert!(!body.contains_key("url"));
        assert!(!body.contains_key("description"));
    }

    #[test]
    fn test_payload_rejects_missing_required() {
        let submitted = form(&[("institution", "State U"), ("degree", "  ")]);
        let err = payload(Resource::Education, &submitted, None).unwrap_err();

        assert_eq!(err.message, "Required: Degree");
        assert_eq!(err.fields.len(), EDUCATION_FIELDS.len());
        assert_eq!(err.fields[0].value, "State U");
    }

    #[test]
    fn test_payload_merges_onto_existing_record() {
        let existing = json!({
            "id": 4,
            "name": "Rust",
            "description": "old",
            "level": "expert"
        });
        let submitted = form(&[("name", "Rust"), ("description", "new")]);
        let body = payload(Resource::Skills, &submitted, Some(&existing)).unwrap();

        assert_eq!(body.get("description"), Some(&json!("new")));
        assert_eq!(body.get("level"), Some(&json!("expert")));
        assert!(!body.contains_key("id"));
    }

    #[test]
    fn test_payload_clears_emptied_field_and_aliases() {
        let existing = json!({
            "institution": "State U",
            "degree": "BSc",
            "end_date": "2020-06-30"
        });
        let submitted = form(&[("institution", "State U"), ("degree", "BSc"), ("endDate", "")]);
        let body = payload(Resource::Education, &submitted, Some(&existing)).unwrap();

        assert!(!body.contains_key("endDate"));
        assert!(!body.contains_key("end_date"));
    }

    #[test]
    fn test_prefill_reads_aliases_and_trims_dates() {
        let record = json!({
            "institution": "State U",
            "degree": "BSc",
            "field_of_study": "Physics",
            "startDate": "2016-09-01T00:00:00Z"
        });
        let fields = prefill(Resource::Education, &record);
        let value = |name: &str| {
            fields
                .iter()
                .find(|f| f.name == name)
                .map(|f| f.value.clone())
                .unwrap()
        };

        assert_eq!(value("fieldOfStudy"), "Physics");
        assert_eq!(value("startDate"), "2016-09-01");
        assert_eq!(value("endDate"), "");
    }

    #[test]
    fn test_form_field_rendering_hints() {
        let fields = blank(Resource::Websites);
        let url = fields.iter().find(|f| f.name == "url").unwrap();
        assert_eq!(url.input_type(), "url");
        assert!(!url.is_multiline());

        let content = fields.iter().find(|f| f.name == "content").unwrap();
        assert!(content.is_multiline());
        assert!(content.is_markdown());
    }
}
