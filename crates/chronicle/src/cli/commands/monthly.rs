//! Monthly command

use chrono::{Local, NaiveDate};
use clap::Args;
use tracing::info;

use chronicle_changelog::update_monthly;

use super::{changelog_path, commit_source, finish, load_config, parse_date};
use crate::cli::Cli;

/// Add a section for the previous month's commits
#[derive(Debug, Args)]
pub struct MonthlyCommand {
    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub today: Option<NaiveDate>,

    /// Print the updated changelog instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

impl MonthlyCommand {
    /// Execute the monthly command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        info!(%today, dry_run = self.dry_run, "executing monthly command");

        let cwd = std::env::current_dir()?;
        let config = load_config(&cwd)?;
        let source = commit_source(&cwd, &config)?;
        let path = changelog_path(&cwd, &config);

        let report = update_monthly(&source, &config.changelog, &path, today, self.dry_run)?;

        finish(cli, &report, &config.changelog.anchor, self.dry_run)
    }
}
