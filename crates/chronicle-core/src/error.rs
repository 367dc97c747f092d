//! Error types for chronicle

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ChronicleError
pub type Result<T> = std::result::Result<T, ChronicleError>;

/// Main error type for chronicle operations
#[derive(Debug, Error)]
pub enum ChronicleError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Changelog-related errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// The git binary could not be started
    #[error("Failed to run {binary}: {reason}")]
    SpawnFailed { binary: String, reason: String },

    /// The git command exited unsuccessfully
    #[error("git {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// The git command did not finish in time
    #[error("git {command} timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),

    /// IO error while talking to a git process
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Changelog-related errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Changelog file not found
    #[error("Changelog file not found at {0}")]
    FileNotFound(PathBuf),

    /// Failed to write changelog
    #[error("Failed to write changelog {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// A date argument could not be parsed
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_error_messages() {
        let err = GitError::Timeout {
            command: "log".to_string(),
            seconds: 5,
        };
        assert_eq!(err.to_string(), "git log timed out after 5s");

        let err: ChronicleError = err.into();
        assert!(matches!(err, ChronicleError::Git(GitError::Timeout { .. })));
    }

    #[test]
    fn test_config_error_wraps_transparently() {
        let err: ChronicleError = ConfigError::InvalidValue {
            field: "changelog.file".to_string(),
            message: "cannot be empty".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: changelog.file - cannot be empty"
        );
    }
}
