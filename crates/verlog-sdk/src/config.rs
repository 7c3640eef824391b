use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use verlog_store::CollectionSchema;

use crate::error::{SdkError, SdkResult};

/// Configuration for [`VersionLog`](crate::VersionLog).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Extra read-modify-write attempts after a version conflict.
    pub max_conflict_retries: u32,
    /// Size bound applied by `changes_since`. `None` disables it.
    pub default_max_log_len: Option<usize>,
    /// Physical field names of the backing collection.
    pub collection: CollectionSchema,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: 8,
            default_max_log_len: Some(100),
            collection: CollectionSchema::default(),
        }
    }
}

impl SdkConfig {
    pub fn from_toml_str(raw: &str) -> SdkResult<Self> {
        toml::from_str(raw).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> SdkResult<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
            .map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = SdkConfig::default();
        assert_eq!(c.max_conflict_retries, 8);
        assert_eq!(c.default_max_log_len, Some(100));
        assert_eq!(c.collection, CollectionSchema::update_time("version_log"));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let c = SdkConfig::from_toml_str("max_conflict_retries = 2\n").unwrap();
        assert_eq!(c.max_conflict_retries, 2);
        assert_eq!(c.default_max_log_len, Some(100));
    }

    #[test]
    fn collection_table() {
        let raw = r#"
            default_max_log_len = 20

            [collection]
            name = "conversation_version"
            id_field = "d_id"
            update_time_field = "last_update"
        "#;
        let c = SdkConfig::from_toml_str(raw).unwrap();
        assert_eq!(c.default_max_log_len, Some(20));
        assert_eq!(c.collection, CollectionSchema::last_update("conversation_version"));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = SdkConfig::from_toml_str("max_conflict_retries = \"many\"").unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SdkConfig::load(Path::new("/nonexistent/verlog.toml")).unwrap_err();
        assert!(matches!(err, SdkError::Io(_)));
    }
}
