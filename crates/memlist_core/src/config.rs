//! Application configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is valid.
//!
//! ```toml
//! db_path = "/home/me/.memlist/memlist.sqlite3"
//! log_dir = "/home/me/.memlist/logs"
//! log_level = "info"
//!
//! [list]
//! layout = "grouped"      # single | grouped
//! overflow = "drop"       # drop | reject | merge_into_last
//! ```

use crate::reconcile::reconciler::OverflowPolicy;
use crate::reconcile::section::SectionLayout;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_FILE_NAME: &str = "memlist.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Absolute directory for rolling log files; file logging is off when
    /// unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Falls back to `default_log_level()` when unset.
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub list: ListConfig,
}

fn default_db_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_FILE_NAME)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_dir: None,
            log_level: None,
            list: ListConfig::default(),
        }
    }
}

/// Section layout and overflow handling for the memory list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default)]
    pub layout: SectionLayout,
    #[serde(default)]
    pub overflow: OverflowPolicy,
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn effective_log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or(crate::logging::default_log_level())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, DEFAULT_DB_FILE_NAME};
    use crate::reconcile::reconciler::OverflowPolicy;
    use crate::reconcile::section::SectionLayout;
    use std::path::PathBuf;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.list.layout, SectionLayout::Grouped);
        assert_eq!(config.list.overflow, OverflowPolicy::Drop);
    }

    #[test]
    fn list_section_overrides_layout_and_policy() {
        let config = AppConfig::from_toml_str(
            r#"
            db_path = "/tmp/m.sqlite3"
            log_level = "warn"

            [list]
            layout = "single"
            overflow = "merge_into_last"
            "#,
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/m.sqlite3"));
        assert_eq!(config.effective_log_level(), "warn");
        assert_eq!(config.list.layout, SectionLayout::Single);
        assert_eq!(config.list.overflow, OverflowPolicy::MergeIntoLast);
    }

    #[test]
    fn unset_log_level_falls_back_to_build_default() {
        let config = AppConfig::default();
        assert!(config.log_level.is_none());
        assert_eq!(
            config.effective_log_level(),
            crate::logging::default_log_level()
        );
    }

    #[test]
    fn unknown_policy_is_a_parse_error() {
        let err = AppConfig::from_toml_str("[list]\noverflow = \"explode\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
