//! Engine configuration
//!
//! Loaded from a JSON file. Every field is optional; missing fields take
//! the defaults below. A loaded configuration is always validated.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::comparison::quote_identifier;
use crate::mime::{MimeGroup, MimeTypeRegistry};
use crate::observability::{Event, Logger, Severity};

/// Largest accepted site offset from UTC
pub const MAX_UTC_OFFSET_SECONDS: i32 = 18 * 3600;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "MEDIA_QUERY_CONFIG_READ",
            ConfigError::Parse(_) => "MEDIA_QUERY_CONFIG_PARSE",
            ConfigError::Invalid(_) => "MEDIA_QUERY_CONFIG_INVALID",
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Query engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum severity written to the log (default WARN)
    #[serde(default)]
    pub log_level: Severity,

    /// Site timezone as seconds east of UTC; dates are decomposed in it
    #[serde(default)]
    pub utc_offset_seconds: i32,

    /// Replaces the built-in mime-type group table when present; order is kept
    #[serde(default)]
    pub mime_groups: Option<Vec<MimeGroup>>,

    /// Prefix of every store table (default `wp_`)
    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,

    /// Post types whose content is scanned for references
    #[serde(default = "default_content_post_types")]
    pub content_post_types: Vec<String>,

    /// Post types never scanned, even when listed above
    #[serde(default = "default_excluded_post_types")]
    pub excluded_post_types: Vec<String>,
}

fn default_table_prefix() -> String {
    "wp_".to_string()
}

fn default_content_post_types() -> Vec<String> {
    vec!["post".to_string(), "page".to_string()]
}

fn default_excluded_post_types() -> Vec<String> {
    ["nav_menu_item", "oembed_cache", "user_request"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: Severity::default(),
            utc_offset_seconds: 0,
            mime_groups: None,
            table_prefix: default_table_prefix(),
            content_post_types: default_content_post_types(),
            excluded_post_types: default_excluded_post_types(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_json(&content)?;

        let path_text = path.display().to_string();
        config
            .logger()
            .log_event(Event::ConfigLoaded, &[("path", path_text.as_str())]);

        Ok(config)
    }

    /// Parse and validate configuration from JSON text
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: EngineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.utc_offset_seconds.abs() > MAX_UTC_OFFSET_SECONDS {
            return Err(ConfigError::Invalid(format!(
                "utc_offset_seconds must be within ±{}, got {}",
                MAX_UTC_OFFSET_SECONDS, self.utc_offset_seconds
            )));
        }

        let posts_table = format!("{}posts", self.table_prefix);
        quote_identifier(&posts_table).map_err(|_| {
            ConfigError::Invalid(format!("Invalid table_prefix: '{}'", self.table_prefix))
        })?;

        if self.searchable_post_types().is_empty() {
            return Err(ConfigError::Invalid(
                "content_post_types is empty after removing excluded_post_types".to_string(),
            ));
        }

        if let Some(groups) = &self.mime_groups {
            if groups.iter().any(|g| g.name.trim().is_empty()) {
                return Err(ConfigError::Invalid(
                    "mime_groups contains an empty group name".to_string(),
                ));
            }
            for (i, group) in groups.iter().enumerate() {
                if groups[..i].iter().any(|g| g.name == group.name) {
                    return Err(ConfigError::Invalid(format!(
                        "mime_groups lists '{}' more than once",
                        group.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Site timezone offset
    pub fn site_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_seconds)
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn logger(&self) -> Logger {
        Logger::new(self.log_level)
    }

    /// Mime-type groups: the configured table, or the built-in one.
    ///
    /// The engine expands groups with the registry handed to it in
    /// `Resolvers`, so pass this one there for the override to apply.
    pub fn mime_registry(&self) -> MimeTypeRegistry {
        match &self.mime_groups {
            Some(groups) => MimeTypeRegistry::from_groups(groups),
            None => MimeTypeRegistry::default(),
        }
    }

    /// Content post types minus the excluded ones, in configured order
    pub fn searchable_post_types(&self) -> Vec<String> {
        self.content_post_types
            .iter()
            .filter(|t| !self.excluded_post_types.contains(t))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_from_empty_object() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.log_level, Severity::Warn);
        assert_eq!(config.table_prefix, "wp_");
        assert_eq!(config.searchable_post_types(), vec!["post", "page"]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"log_level": "TRACE", "utc_offset_seconds": 7200, "table_prefix": "site2_"}}"#
        )
        .unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.log_level, Severity::Trace);
        assert_eq!(config.site_offset(), FixedOffset::east_opt(7200).unwrap());
        assert_eq!(config.table_prefix, "site2_");
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/media-query.json")).unwrap_err();
        assert_eq!(err.code(), "MEDIA_QUERY_CONFIG_READ");
    }

    #[test]
    fn test_invalid_json() {
        let err = EngineConfig::from_json("{not json").unwrap_err();
        assert_eq!(err.code(), "MEDIA_QUERY_CONFIG_PARSE");
    }

    #[test]
    fn test_offset_out_of_range() {
        let err = EngineConfig::from_json(r#"{"utc_offset_seconds": 90000}"#).unwrap_err();
        assert_eq!(err.code(), "MEDIA_QUERY_CONFIG_INVALID");
        assert!(err.to_string().contains("utc_offset_seconds"));
    }

    #[test]
    fn test_unsafe_table_prefix() {
        let err = EngineConfig::from_json(r#"{"table_prefix": "wp; DROP"}"#).unwrap_err();
        assert!(err.to_string().contains("table_prefix"));
    }

    #[test]
    fn test_every_content_type_excluded() {
        let err = EngineConfig::from_json(
            r#"{"content_post_types": ["post"], "excluded_post_types": ["post"]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("content_post_types"));
    }

    #[test]
    fn test_mime_group_override() {
        let config = EngineConfig::from_json(
            r#"{"mime_groups": [{"name": "raster", "types": ["image/png", "image/gif"]}]}"#,
        )
        .unwrap();
        let registry = config.mime_registry();
        assert_eq!(registry.groups(), vec!["raster"]);
        assert_eq!(registry.group_by_type("image/gif"), Some("raster"));
    }

    #[test]
    fn test_mime_group_order_preserved() {
        let config = EngineConfig::from_json(
            r#"{"mime_groups": [
                {"name": "video", "types": ["video/mp4"]},
                {"name": "audio", "types": ["audio/mpeg"]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(config.mime_registry().groups(), vec!["video", "audio"]);
    }

    #[test]
    fn test_duplicate_mime_group_rejected() {
        let err = EngineConfig::from_json(
            r#"{"mime_groups": [{"name": "raw", "types": []}, {"name": "raw", "types": []}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), "MEDIA_QUERY_CONFIG_INVALID");
        assert!(err.to_string().contains("raw"));
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        assert!(EngineConfig::from_json(r#"{"log_level": "LOUD"}"#).is_err());
    }
}
