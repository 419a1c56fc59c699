use std::fmt::Display;

/// Name of one cache generation: `<prefix>-<version>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheName(String);

impl CacheName {
    pub fn new(prefix: &str, version: &str) -> Self {
        Self(format!("{prefix}-{version}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if `name` is any generation (current or stale) created with `prefix`
    pub fn is_generation_of(name: &str, prefix: &str) -> bool {
        name.strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('-'))
            .map_or(false, |version| !version.is_empty())
    }

    /// The version suffix of `name` if it was created with `prefix`
    pub fn version_of<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
        if Self::is_generation_of(name, prefix) {
            Some(&name[prefix.len() + 1..])
        } else {
            None
        }
    }
}

impl AsRef<str> for CacheName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CacheName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
