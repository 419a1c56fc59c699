use serde::{Deserialize, Serialize};

use crate::model::{CacheName, VersionPattern};

/// Version stamped in by the build, falls back to the version of the reference deployment
pub const DEFAULT_VERSION: &str = match option_env!("EVENT_MANAGER_VERSION") {
    Some(version) => version,
    None => "1.0.0",
};

pub const DEFAULT_CACHE_PREFIX: &str = "event-manager";

/// The landing page doubles as the version oracle
pub const DEFAULT_ORACLE_URL: &str = "./index.html";

pub const DEFAULT_ASSETS: [&str; 5] = [
    "./",
    "./index.html",
    "./manifest.webmanifest",
    "./icons/icon-192.svg",
    "./icons/icon-512.svg",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid worker config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("worker config field `{0}` must not be empty")]
    EmptyField(&'static str),
    #[error("invalid version pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("version pattern {0:?} has no capture group for the version")]
    MissingCaptureGroup(String),
    #[cfg(feature = "wasm")]
    #[error("worker config is not json serializable: {0}")]
    Js(String),
}

/// Where to look for the deployed version and how to find it in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VersionOracle {
    pub url: String,
    pub pattern: VersionPattern,
}

impl Default for VersionOracle {
    fn default() -> Self {
        Self {
            url: DEFAULT_ORACLE_URL.to_string(),
            pattern: VersionPattern::default(),
        }
    }
}

/// Build-time configuration of one worker deployment.
///
/// Immutable for the lifetime of a worker instance. Every field is optional in
/// the json form, missing fields take the reference deployment's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkerConfig {
    /// Running version, also the suffix of the current cache bucket
    pub version: String,
    pub cache_prefix: String,
    /// Paths that must be cached before install succeeds, in order
    pub assets: Vec<String>,
    pub oracle: VersionOracle,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            cache_prefix: DEFAULT_CACHE_PREFIX.to_string(),
            assets: DEFAULT_ASSETS.iter().map(|a| a.to_string()).collect(),
            oracle: VersionOracle::default(),
        }
    }
}

impl WorkerConfig {
    pub fn new<S: Into<String>>(version: S) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn with_assets<I, S>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assets = assets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_oracle(mut self, oracle: VersionOracle) -> Self {
        self.oracle = oracle;
        self
    }

    /// Parses and validates the json config stamped into the worker script
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config handed to a worker hook: `undefined`/`null` for the
    /// defaults, a json string, or a plain object
    #[cfg(feature = "wasm")]
    pub fn from_js(value: &wasm_bindgen::JsValue) -> Result<Self, ConfigError> {
        use web_sys::js_sys::JSON;

        use crate::error::describe_js_error;

        if value.is_undefined() || value.is_null() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }

        let json = match value.as_string() {
            Some(json) => json,
            None => JSON::stringify(value)
                .map(String::from)
                .map_err(|e| ConfigError::Js(describe_js_error(&e)))?,
        };
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version.trim().is_empty() {
            return Err(ConfigError::EmptyField("version"));
        }
        if self.cache_prefix.trim().is_empty() {
            return Err(ConfigError::EmptyField("cachePrefix"));
        }
        if self.oracle.url.trim().is_empty() {
            return Err(ConfigError::EmptyField("oracle.url"));
        }
        if self.assets.iter().any(|a| a.trim().is_empty()) {
            return Err(ConfigError::EmptyField("assets[]"));
        }
        Ok(())
    }

    /// Name of the bucket owned by this version
    pub fn cache_name(&self) -> CacheName {
        CacheName::new(&self.cache_prefix, &self.version)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_is_reference_deployment() {
        let config = WorkerConfig::new("1.0.0");
        assert_eq!(config.cache_name().as_str(), "event-manager-1.0.0");
        assert_eq!(config.assets.len(), 5);
        assert_eq!(config.assets[0], "./");
        assert_eq!(config.oracle.url, "./index.html");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config =
            WorkerConfig::from_json(r#"{ "version": "1.2.0", "assets": ["./", "./index.html"] }"#)
                .unwrap();
        assert_eq!(config.version, "1.2.0");
        assert_eq!(config.cache_prefix, DEFAULT_CACHE_PREFIX);
        assert_eq!(config.assets, vec!["./", "./index.html"]);
        assert_eq!(config.oracle, VersionOracle::default());
    }

    #[test]
    fn test_from_json_custom_oracle() {
        let config = WorkerConfig::from_json(
            r#"{
                "version": "2.0.0",
                "cachePrefix": "events",
                "oracle": { "url": "./version.json", "pattern": "\"version\":\\s*\"([^\"]+)\"" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.cache_name().as_str(), "events-2.0.0");
        assert_eq!(config.oracle.url, "./version.json");
        assert_eq!(config.oracle.pattern.extract(r#"{"version": "2.1.0"}"#), Some("2.1.0"));
    }

    #[test]
    fn test_from_json_rejects_empty_version() {
        let err = WorkerConfig::from_json(r#"{ "version": " " }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyField("version")));
    }

    #[test]
    fn test_from_json_rejects_pattern_without_group() {
        let err = WorkerConfig::from_json(r#"{ "oracle": { "pattern": "version" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_from_json_rejects_bad_json() {
        assert!(matches!(WorkerConfig::from_json("{"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = WorkerConfig::new("1.0.0").with_assets(["./"]);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(WorkerConfig::from_json(&json).unwrap(), config);
    }
}
