//! Backend-assigned entity identifiers.
//!
//! The backend decides what an identifier looks like. Some deployments hand
//! out integers, others opaque strings, so [`EntityId`] keeps the text form
//! and remembers whether it arrived as a JSON number. Serializing writes it
//! back in the same shape it was received.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing an [`EntityId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EntityIdError {
    /// The identifier is empty or whitespace only.
    #[error("id cannot be empty")]
    Empty,
    /// The identifier contains a character that cannot appear in a URL path segment.
    #[error("id contains a reserved character: {0:?}")]
    ReservedCharacter(char),
}

/// Identifier of a stored entity.
///
/// Never generated client-side: values only come from backend responses or
/// from URLs the user followed.
///
/// ```
/// use folio_core::EntityId;
///
/// let id = EntityId::parse("66a1f0c2").unwrap();
/// assert_eq!(id.as_str(), "66a1f0c2");
/// assert!(EntityId::parse("  ").is_err());
/// assert!(EntityId::parse("a/b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityId {
    text: String,
    numeric: bool,
}

impl EntityId {
    /// Parse an identifier from text.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank or contains `/`, `?`, `#`.
    pub fn parse(s: &str) -> Result<Self, EntityIdError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EntityIdError::Empty);
        }
        if let Some(c) = trimmed.chars().find(|c| matches!(c, '/' | '?' | '#')) {
            return Err(EntityIdError::ReservedCharacter(c));
        }

        Ok(Self {
            text: trimmed.to_owned(),
            numeric: false,
        })
    }

    /// Returns the identifier as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the backend sent this identifier as a JSON number.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        self.numeric
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self {
            text: id.to_string(),
            numeric: true,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::str::FromStr for EntityId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.numeric
            && let Ok(n) = self.text.parse::<i64>()
        {
            return serializer.serialize_i64(n);
        }
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Signed(i64),
            Unsigned(u64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Signed(n) => Ok(Self::from(n)),
            Wire::Unsigned(n) => Ok(Self {
                text: n.to_string(),
                numeric: true,
            }),
            Wire::Text(s) => Self::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id = EntityId::parse("  42 ").unwrap();
        assert_eq!(id.as_str(), "42");
        assert!(!id.is_numeric());
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(EntityId::parse(""), Err(EntityIdError::Empty));
        assert_eq!(EntityId::parse("   "), Err(EntityIdError::Empty));
    }

    #[test]
    fn test_parse_rejects_path_characters() {
        assert_eq!(
            EntityId::parse("1?id=2"),
            Err(EntityIdError::ReservedCharacter('?'))
        );
    }

    #[test]
    fn test_numeric_id_keeps_its_json_shape() {
        let id: EntityId = serde_json::from_str("17").unwrap();
        assert!(id.is_numeric());
        assert_eq!(id.to_string(), "17");
        assert_eq!(serde_json::to_string(&id).unwrap(), "17");
    }

    #[test]
    fn test_string_id_keeps_its_json_shape() {
        let id: EntityId = serde_json::from_str("\"66a1f0c2e4\"").unwrap();
        assert!(!id.is_numeric());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"66a1f0c2e4\"");
    }

    #[test]
    fn test_blank_string_id_fails_to_deserialize() {
        assert!(serde_json::from_str::<EntityId>("\"\"").is_err());
    }
}
