//! Output formatting utilities

use console::style;

use chronicle_changelog::{CategorizedCommits, MergeOutcome, RunReport};
use chronicle_git::short_hash;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Create a styled header
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// Create a styled key-value line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// Summary of an update run
pub fn report(report: &RunReport, anchor: &str) {
    println!("{}", header("Changelog update"));
    println!("{}", key_value("File", &style(report.path.display()).cyan().to_string()));
    if let Some(label) = &report.label {
        println!("{}", key_value("Month", label));
    }
    println!("{}", key_value("Range", &report.range.to_string()));
    println!("{}", key_value("Commits", &report.commits_seen.to_string()));
    if report.malformed > 0 {
        println!("{}", key_value("Skipped (not conventional)", &report.malformed.to_string()));
    }
    if report.undated > 0 {
        println!("{}", key_value("Skipped (no date)", &report.undated.to_string()));
    }
    println!();

    let message = report.outcome.message(anchor);
    match &report.outcome {
        MergeOutcome::Inserted { .. } | MergeOutcome::Created { .. } if report.written => success(&message),
        MergeOutcome::Inserted { .. } | MergeOutcome::Created { .. } => {
            info(&format!("{} (dry run, nothing written)", message))
        }
        MergeOutcome::DuplicateSection { .. } => warning(&message),
        MergeOutcome::NothingToInsert => info(&message),
        // Reported on stderr by the caller
        MergeOutcome::AnchorMissing => {}
    }
}

/// Categorized entries, one block per category
pub fn categories(commits: &CategorizedCommits) {
    for (category, entries) in commits.iter() {
        println!("{}", header(category.as_str()));
        for entry in entries {
            let short = style(short_hash(&entry.hash)).yellow();
            match &entry.date {
                Some(date) => println!("  - {} {} {}", entry.description, style(format!("[{}]", date)).dim(), short),
                None => println!("  - {} {}", entry.description, short),
            }
        }
        println!();
    }
}
