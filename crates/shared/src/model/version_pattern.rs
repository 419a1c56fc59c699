use std::fmt::Display;

use regex::Regex;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use crate::model::ConfigError;

/// Marker the build stamps into the landing page, e.g. `<span class="version">v1.2.0</span>`
pub const DEFAULT_VERSION_PATTERN: &str = r#"version">v([\d.]+)</span>"#;

/// Pattern used to scrape the deployed version out of the oracle document.
///
/// The first capture group is the version token.
#[derive(Debug, Clone)]
pub struct VersionPattern(Regex);

impl VersionPattern {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern)?;

        // captures_len includes the implicit whole-match group
        if regex.captures_len() < 2 {
            return Err(ConfigError::MissingCaptureGroup(pattern.to_string()));
        }

        Ok(Self(regex))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The version token embedded in `body`, if the marker is present
    pub fn extract<'a>(&self, body: &'a str) -> Option<&'a str> {
        self.0
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .filter(|v| !v.is_empty())
    }
}

impl Default for VersionPattern {
    fn default() -> Self {
        Self(Regex::new(DEFAULT_VERSION_PATTERN).expect("DEFAULT_VERSION_PATTERN is a valid regex"))
    }
}

impl PartialEq for VersionPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Display for VersionPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_str().fmt(f)
    }
}

impl Serialize for VersionPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VersionPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        Self::new(&pattern).map_err(D::Error::custom)
    }
}
