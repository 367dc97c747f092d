//! Configuration validation

use chrono::format::{Item, StrftimeItems};
use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_changelog(config)?;
    validate_git(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_changelog(config: &Config) -> Result<()> {
    if config.changelog.file.as_os_str().is_empty() {
        return Err(invalid("changelog.file", "file cannot be empty"));
    }

    if config.changelog.anchor.trim().is_empty() {
        return Err(invalid("changelog.anchor", "anchor cannot be empty"));
    }

    if config.changelog.anchor.contains('\n') {
        return Err(invalid("changelog.anchor", "anchor must fit on one line"));
    }

    let format = &config.changelog.date_format;
    if format.is_empty() || StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(invalid(
            "changelog.date_format",
            &format!("'{}' is not a valid date format", format),
        ));
    }

    for name in config.changelog.types.keys() {
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(invalid(
                &format!("changelog.types.{}", name),
                "commit types must be word characters",
            ));
        }
    }

    Ok(())
}

fn validate_git(config: &Config) -> Result<()> {
    if config.git.binary.trim().is_empty() {
        return Err(invalid("git.binary", "binary cannot be empty"));
    }

    if config.git.timeout_secs == 0 {
        return Err(invalid("git.timeout_secs", "timeout must be greater than zero"));
    }

    Ok(())
}

fn invalid(field: &str, message: &str) -> crate::error::ChronicleError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}
