//! CLI commands

mod completions;
mod init;
mod monthly;
mod preview;
mod update;

pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use monthly::MonthlyCommand;
pub use preview::PreviewCommand;
pub use update::UpdateCommand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use tracing::debug;

use chronicle_changelog::{MergeOutcome, RunReport};
use chronicle_core::config::{load_config_or_default, Config, GitBackend};
use chronicle_core::error::ChangelogError;
use chronicle_git::{CommitRange, CommitSource, GitCli, GitRepo};

use crate::cli::{output, Cli, OutputFormat};
use crate::exit_codes;

/// Parse a `YYYY-MM-DD` command-line date
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, ChangelogError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ChangelogError::InvalidDate(value.to_string()))
}

/// Commit window from `--since` / `--until` / `--all`, or `None` for the default
pub(crate) fn range_from_args(
    since: Option<NaiveDate>,
    until: Option<NaiveDate>,
    all: bool,
) -> anyhow::Result<Option<CommitRange>> {
    if all {
        return Ok(Some(CommitRange::All));
    }

    match (since, until) {
        (Some(from), Some(until)) if until <= from => {
            anyhow::bail!("--until ({}) must be after --since ({})", until, from)
        }
        (Some(from), Some(until)) => Ok(Some(CommitRange::Between { from, until })),
        (Some(from), None) => Ok(Some(CommitRange::Since(from))),
        (None, Some(_)) => anyhow::bail!("--until requires --since"),
        (None, None) => Ok(None),
    }
}

/// Configuration for the working directory, or defaults
pub(crate) fn load_config(cwd: &Path) -> anyhow::Result<Config> {
    let (config, path) = load_config_or_default(cwd)?;
    if let Some(path) = path {
        debug!(path = %path.display(), "loaded config");
    }
    Ok(config)
}

/// Changelog file for the working directory
pub(crate) fn changelog_path(cwd: &Path, config: &Config) -> PathBuf {
    cwd.join(&config.changelog.file)
}

/// Commit source selected by `git.backend`
pub(crate) fn commit_source(cwd: &Path, config: &Config) -> anyhow::Result<Box<dyn CommitSource>> {
    let date_format = config.changelog.date_format.clone();
    let source: Box<dyn CommitSource> = match config.git.backend {
        GitBackend::Cli => Box::new(
            GitCli::new(cwd)
                .with_binary(config.git.binary.clone())
                .with_timeout(Duration::from_secs(config.git.timeout_secs))
                .with_date_format(date_format),
        ),
        GitBackend::Libgit2 => Box::new(GitRepo::discover(cwd)?.with_date_format(date_format)),
    };
    Ok(source)
}

/// Print a run report and exit non-zero when the document has no anchor
pub(crate) fn finish(cli: &Cli, report: &RunReport, anchor: &str, dry_run: bool) -> anyhow::Result<()> {
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => {
            if dry_run {
                if let Some(text) = report.outcome.text() {
                    print!("{}", text);
                }
            }
            if !cli.quiet {
                output::report(report, anchor);
            }
        }
    }

    if report.outcome == MergeOutcome::AnchorMissing {
        output::error(&report.outcome.message(anchor));
        std::process::exit(exit_codes::CHANGELOG_ERROR);
    }

    Ok(())
}
