//! Default configuration values

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "chronicle.yaml";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "chronicle.toml";

/// Alternative configuration file name
pub const ALT_CONFIG_FILE: &str = ".chronicle.yaml";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_YAML,
        DEFAULT_CONFIG_TOML,
        ALT_CONFIG_FILE,
        ".chronicle.toml",
    ]
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# chronicle configuration

changelog:
  file: CHANGELOG.md
  anchor: "[Unreleased]"
  date_format: "%d-%m-%Y"
  # source | date | lexical
  sort: source
  # Extra commit types on top of the built-in table (feat, fix, docs, ...)
  types:
    security: Security
    deprecate: Deprecated
    remove: Removed

git:
  # cli | libgit2
  backend: cli
  binary: git
  timeout_secs: 30
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{validate_config, Config, GitBackend};
    use crate::types::Category;

    #[test]
    fn test_template_parses_and_validates() {
        let config: Config = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.git.backend, GitBackend::Cli);
        assert_eq!(
            config.changelog.types.get("deprecate"),
            Some(&Category::Deprecated)
        );
    }
}
