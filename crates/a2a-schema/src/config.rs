//! Validation configuration — typically the `[validation]` table of a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Switches for the checks that go beyond JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Require URL-valued fields to parse as absolute URLs.
    #[serde(default = "default_true")]
    pub verify_urls: bool,

    /// Require inline file `bytes` to be valid base64.
    #[serde(default = "default_true")]
    pub verify_file_bytes: bool,

    /// Treat a card whose `additionalInterfaces` omits `(url, preferredTransport)`
    /// as invalid instead of warning.
    #[serde(default)]
    pub require_preferred_interface: bool,

    /// What to do with documents in the older schema shape.
    #[serde(default)]
    pub superseded_shapes: SupersededShapePolicy,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            verify_urls: true,
            verify_file_bytes: true,
            require_preferred_interface: false,
            superseded_shapes: SupersededShapePolicy::default(),
        }
    }
}

impl ValidationConfig {
    /// Every optional check turned on and superseded shapes refused.
    pub fn strict() -> Self {
        Self {
            require_preferred_interface: true,
            superseded_shapes: SupersededShapePolicy::Reject,
            ..Self::default()
        }
    }

    /// Only structural checks: no URL, base64 or interface checks.
    pub fn lenient() -> Self {
        Self {
            verify_urls: false,
            verify_file_bytes: false,
            require_preferred_interface: false,
            superseded_shapes: SupersededShapePolicy::Accept,
        }
    }

    /// Parse from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }
}

fn default_true() -> bool {
    true
}

/// Handling of documents written against the superseded schema revision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupersededShapePolicy {
    /// Accept and log a warning.
    #[default]
    Accept,
    /// Reject as invalid.
    Reject,
}

/// Failure to load a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_from_empty_table() {
        assert_eq!(ValidationConfig::from_toml("").unwrap(), ValidationConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = ValidationConfig::from_toml(
            "verify_urls = false\nsuperseded_shapes = \"reject\"\n",
        )
        .unwrap();
        assert!(!config.verify_urls);
        assert!(config.verify_file_bytes);
        assert_eq!(config.superseded_shapes, SupersededShapePolicy::Reject);
    }

    #[test]
    fn test_bad_policy_rejected() {
        let err = ValidationConfig::from_toml("superseded_shapes = \"ignore\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ValidationConfig::load(Path::new("/nonexistent/a2a-schema.toml")).unwrap_err();
        assert!(err.to_string().starts_with("cannot read /nonexistent/a2a-schema.toml"));
    }
}
