//! Update command

use chrono::NaiveDate;
use clap::Args;
use tracing::info;

use chronicle_changelog::update_unreleased;

use super::{changelog_path, commit_source, finish, load_config, parse_date, range_from_args};
use crate::cli::Cli;

/// Append commits to the Unreleased section
#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Include commits on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub since: Option<NaiveDate>,

    /// Include commits before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date, requires = "since")]
    pub until: Option<NaiveDate>,

    /// Include the whole history, ignoring the last release
    #[arg(long, conflicts_with_all = ["since", "until"])]
    pub all: bool,

    /// Print the updated changelog instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

impl UpdateCommand {
    /// Execute the update command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(since = ?self.since, until = ?self.until, all = self.all, dry_run = self.dry_run, "executing update command");
        let cwd = std::env::current_dir()?;
        let config = load_config(&cwd)?;
        let range = range_from_args(self.since, self.until, self.all)?;

        let source = commit_source(&cwd, &config)?;
        let path = changelog_path(&cwd, &config);
        let report = update_unreleased(&source, &config.changelog, &path, range, self.dry_run)?;

        finish(cli, &report, &config.changelog.anchor, self.dry_run)
    }
}
