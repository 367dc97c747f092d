//! Preview command

use chrono::{Local, NaiveDate};
use clap::Args;
use console::style;
use tracing::info;

use chronicle_changelog::merger::read_document;
use chronicle_changelog::workflow::default_range;
use chronicle_changelog::{collect, previous_month, Classifier, DateRequirement};
use chronicle_git::CommitRange;

use super::{changelog_path, commit_source, load_config, parse_date, range_from_args};
use crate::cli::{output, Cli, OutputFormat};

/// Show how commits would be categorized, without touching the changelog
#[derive(Debug, Args)]
pub struct PreviewCommand {
    /// Include commits on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date, conflicts_with = "monthly")]
    pub since: Option<NaiveDate>,

    /// Include commits before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date, requires = "since")]
    pub until: Option<NaiveDate>,

    /// Include the whole history
    #[arg(long, conflicts_with_all = ["since", "until", "monthly"])]
    pub all: bool,

    /// Preview the previous month, as `chronicle monthly` would see it
    #[arg(long)]
    pub monthly: bool,

    /// Treat this date as today for --monthly (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date, requires = "monthly")]
    pub today: Option<NaiveDate>,
}

impl PreviewCommand {
    /// Execute the preview command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(monthly = self.monthly, all = self.all, "executing preview command");
        let cwd = std::env::current_dir()?;
        let config = load_config(&cwd)?;

        let (range, dates, label) = if self.monthly {
            let window = previous_month(self.today.unwrap_or_else(|| Local::now().date_naive()));
            let range = CommitRange::Between {
                from: window.start,
                until: window.end,
            };
            (range, DateRequirement::Required, Some(window.label))
        } else {
            let range = match range_from_args(self.since, self.until, self.all)? {
                Some(range) => range,
                None => default_range(read_document(&changelog_path(&cwd, &config))?.as_deref()),
            };
            (range, DateRequirement::Optional, None)
        };

        let source = commit_source(&cwd, &config)?;
        let classifier = Classifier::from_config(&config.changelog);
        let collection = collect(&source, &classifier, &range, dates);

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&collection)?);
            }
            OutputFormat::Text => {
                let title = match &label {
                    Some(label) => format!("{} ({})", label, range),
                    None => range.to_string(),
                };
                println!("{}", output::header(&format!("Commits: {}", title)));
                println!();

                if collection.classification.commits.is_empty() {
                    println!("{}", style("No conventional commits found.").yellow());
                } else {
                    output::categories(&collection.classification.commits);
                }

                if !cli.quiet {
                    println!(
                        "{} commits, {} entries, {} not conventional, {} without a date",
                        collection.seen,
                        collection.classification.commits.len(),
                        collection.classification.malformed,
                        collection.classification.undated
                    );
                }
            }
        }

        Ok(())
    }
}
