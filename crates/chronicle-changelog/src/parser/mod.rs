//! Commit subject parsing

mod conventional;

pub use conventional::ConventionalParser;

use crate::types::ParsedCommit;

/// Trait for commit subject parsers
pub trait CommitParser: Send + Sync {
    /// Split a subject line into its parts, or `None` if it does not conform
    fn parse(&self, subject: &str) -> Option<ParsedCommit>;
}
