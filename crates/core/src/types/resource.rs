//! Logical resource names and their REST endpoints.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string names no known resource.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown resource: {0}")]
pub struct UnknownResource(pub String);

/// A resource collection exposed by the backend.
///
/// Closed set: adding a resource means adding a variant, and every `match`
/// over resources has to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Websites,
    Music,
    Contributions,
    Skills,
    Education,
    User,
}

impl Resource {
    /// Resources managed through the admin pages, in dashboard order.
    pub const CONTENT: [Self; 5] = [
        Self::Websites,
        Self::Music,
        Self::Contributions,
        Self::Skills,
        Self::Education,
    ];

    /// Endpoint path segment under the API base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Websites => "websites",
            Self::Music => "music",
            Self::Contributions => "contributions",
            Self::Skills => "skills",
            Self::Education => "education",
            Self::User => "user",
        }
    }

    /// Plural display title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Websites => "Websites",
            Self::Music => "Music Works",
            Self::Contributions => "Contributions",
            Self::Skills => "Skills",
            Self::Education => "Education",
            Self::User => "Users",
        }
    }

    /// Singular display name, used in "Add New ..." links.
    #[must_use]
    pub const fn singular(self) -> &'static str {
        match self {
            Self::Websites => "Website",
            Self::Music => "Music Work",
            Self::Contributions => "Contribution",
            Self::Skills => "Skill",
            Self::Education => "Education",
            Self::User => "User",
        }
    }

    /// Whether records of this resource can be edited from the admin pages.
    #[must_use]
    pub const fn is_content(self) -> bool {
        !matches!(self, Self::User)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl std::str::FromStr for Resource {
    type Err = UnknownResource;

    /// Parses an endpoint path. `music-works` is accepted for [`Resource::Music`]
    /// because older admin links use it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "websites" => Ok(Self::Websites),
            "music" | "music-works" => Ok(Self::Music),
            "contributions" => Ok(Self::Contributions),
            "skills" => Ok(Self::Skills),
            "education" => Ok(Self::Education),
            "user" | "users" => Ok(Self::User),
            _ => Err(UnknownResource(s.to_owned())),
        }
    }
}
