//! Runtime configuration for a tracker instance.
//!
//! Every field has a default, so an empty JSON object (or no config at all)
//! yields a working setup.

use serde::{Deserialize, Serialize};

/// Default LMDB environment name.
pub const DEFAULT_DB_NAME: &str = "study_tracker";

/// Default slot key holding the serialized roadmap.
pub const DEFAULT_STORAGE_KEY: &str = "leetcodeRoadmap";

/// Default LMDB map size (10 MiB).
pub const DEFAULT_MAP_SIZE: usize = 10 * 1024 * 1024;

/// How thoroughly a persisted payload is checked before it is merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationMode {
    /// Payload must be an array whose first element carries an `id`.
    /// Malformed nodes further down are skipped individually.
    #[default]
    Shallow,
    /// Every top-level element must be an object with a string `id`,
    /// otherwise the whole payload is discarded.
    Strict,
}

/// How persisted problems are matched to canonical ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentityPolicy {
    /// Match on `id` only.
    #[default]
    Id,
    /// Match on `id`; persisted problems without an `id` fall back to `name`.
    /// Only useful when importing snapshots from builds that predate problem ids.
    IdThenLegacyName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerConfig {
    pub db_name: String,
    pub storage_key: String,
    pub map_size: usize,
    pub validation: ValidationMode,
    pub identity: IdentityPolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            db_name: DEFAULT_DB_NAME.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            map_size: DEFAULT_MAP_SIZE,
            validation: ValidationMode::default(),
            identity: IdentityPolicy::default(),
        }
    }
}

impl TrackerConfig {
    pub fn with_db_name(name: impl Into<String>) -> Self {
        Self {
            db_name: name.into(),
            ..Self::default()
        }
    }

    /// Parses a JSON config, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
