//! Configuration types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::types::{Category, SortOrder};

/// Main configuration for chronicle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Changelog configuration
    pub changelog: ChangelogConfig,

    /// Git configuration
    pub git: GitConfig,
}

/// Changelog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Changelog file path, relative to the working directory
    pub file: PathBuf,

    /// Token identifying the unreleased anchor line
    pub anchor: String,

    /// Header written when a new changelog is created
    pub header: String,

    /// chrono format used to display commit dates
    pub date_format: String,

    /// Ordering of entries within each category
    pub sort: SortOrder,

    /// Extra commit types mapped to categories, layered over the built-in table
    pub types: BTreeMap<String, Category>,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("CHANGELOG.md"),
            anchor: "[Unreleased]".to_string(),
            header: DEFAULT_HEADER.to_string(),
            date_format: "%d-%m-%Y".to_string(),
            sort: SortOrder::Source,
            types: BTreeMap::new(),
        }
    }
}

/// Header of a freshly created changelog
pub const DEFAULT_HEADER: &str = "# CHANGELOG\n\nAll notable changes to this project will be documented in this file.  \nThis project adheres to [Semantic Versioning](https://semver.org/).\n";

/// Which implementation reads commit history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitBackend {
    /// Spawn the git binary
    #[default]
    Cli,
    /// Walk history in-process with libgit2
    Libgit2,
}

/// Git configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Commit source implementation
    pub backend: GitBackend,

    /// git executable used by the cli backend
    pub binary: String,

    /// Seconds before a git invocation is killed
    pub timeout_secs: u64,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            backend: GitBackend::Cli,
            binary: "git".to_string(),
            timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.changelog.file, PathBuf::from("CHANGELOG.md"));
        assert_eq!(config.changelog.anchor, "[Unreleased]");
        assert_eq!(config.git.backend, GitBackend::Cli);
        assert_eq!(config.git.timeout_secs, 30);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "changelog:\n  sort: date\n  types:\n    build: Changed\n    sec: Security\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.changelog.sort, SortOrder::Date);
        assert_eq!(config.changelog.types.get("sec"), Some(&Category::Security));
        assert_eq!(config.changelog.date_format, "%d-%m-%Y");
        assert_eq!(config.git.binary, "git");
    }

    #[test]
    fn test_toml_backend() {
        let config: Config = toml::from_str("[git]\nbackend = \"libgit2\"\n").unwrap();
        assert_eq!(config.git.backend, GitBackend::Libgit2);
    }
}
