//! Markdown rendering of categorized entries

use tracing::debug;

use crate::types::CategorizedCommits;

/// Flat block for the Unreleased section: `### <Category>` and `- <entry>` lines
pub fn render_flat(commits: &CategorizedCommits) -> String {
    let mut output = String::new();

    for (category, entries) in commits.iter() {
        output.push_str(&format!("\n### {}\n", category));
        for entry in entries {
            output.push_str(&format!("- {}\n", entry.description));
        }
    }

    debug!(output_len = output.len(), "flat block rendered");
    output
}

/// Monthly block: `### <month>` with `#### <Category>` subsections and dated entries
pub fn render_monthly(label: &str, commits: &CategorizedCommits) -> String {
    let mut output = format!("\n### {}\n", label);

    for (category, entries) in commits.iter() {
        output.push_str(&format!("\n#### {}\n", category));
        for entry in entries {
            match &entry.date {
                Some(date) => output.push_str(&format!("- {} [{}]\n", entry.description, date)),
                None => output.push_str(&format!("- {}\n", entry.description)),
            }
        }
    }
    output.push('\n');

    debug!(label, output_len = output.len(), "monthly block rendered");
    output
}
