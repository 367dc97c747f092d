//! The commit source abstraction

use chrono::NaiveDate;
use tracing::debug;

use crate::types::{CommitRange, CommitRecord};

/// Anything that can list commits and look up their dates.
///
/// Implementations never fail the caller: an unavailable history reads as
/// "no commits" and a failed date lookup reads as "no date".
pub trait CommitSource {
    /// Commits in the window, newest first
    fn list_commits(&self, range: &CommitRange) -> Vec<CommitRecord>;

    /// Display-formatted date for a single commit
    fn commit_date(&self, hash: &str) -> Option<String>;
}

impl<S: CommitSource + ?Sized> CommitSource for &S {
    fn list_commits(&self, range: &CommitRange) -> Vec<CommitRecord> {
        (**self).list_commits(range)
    }

    fn commit_date(&self, hash: &str) -> Option<String> {
        (**self).commit_date(hash)
    }
}

impl<S: CommitSource + ?Sized> CommitSource for Box<S> {
    fn list_commits(&self, range: &CommitRange) -> Vec<CommitRecord> {
        (**self).list_commits(range)
    }

    fn commit_date(&self, hash: &str) -> Option<String> {
        (**self).commit_date(hash)
    }
}

/// In-memory commit history, newest first
#[derive(Debug, Clone)]
pub struct MemorySource {
    commits: Vec<(CommitRecord, Option<NaiveDate>)>,
    date_format: String,
}

impl MemorySource {
    /// Create an empty history using the default display format
    pub fn new() -> Self {
        Self {
            commits: Vec::new(),
            date_format: "%d-%m-%Y".to_string(),
        }
    }

    /// Set the display format used by [`CommitSource::commit_date`]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Add a commit made on `date`
    pub fn commit(mut self, hash: &str, subject: &str, date: NaiveDate) -> Self {
        self.commits.push((CommitRecord::new(hash, subject), Some(date)));
        self
    }

    /// Add a commit whose date cannot be looked up
    pub fn undated_commit(mut self, hash: &str, subject: &str) -> Self {
        self.commits.push((CommitRecord::new(hash, subject), None));
        self
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitSource for MemorySource {
    fn list_commits(&self, range: &CommitRange) -> Vec<CommitRecord> {
        let commits: Vec<CommitRecord> = self
            .commits
            .iter()
            .filter(|(_, date)| match date {
                Some(date) => range.contains(*date),
                None => *range == CommitRange::All,
            })
            .map(|(record, _)| record.clone())
            .collect();
        debug!(%range, count = commits.len(), "listed in-memory commits");
        commits
    }

    fn commit_date(&self, hash: &str) -> Option<String> {
        self.commits
            .iter()
            .find(|(record, _)| record.hash == hash)
            .and_then(|(_, date)| *date)
            .map(|date| date.format(&self.date_format).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_memory_source_filters_range() {
        let source = MemorySource::new()
            .commit("c3", "feat: april", date("2025-04-02"))
            .commit("c2", "fix: march", date("2025-03-15"))
            .commit("c1", "docs: february", date("2025-02-10"));

        let range = CommitRange::Between {
            from: date("2025-03-01"),
            until: date("2025-04-01"),
        };
        let commits = source.list_commits(&range);
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].hash, "c2");

        assert_eq!(source.list_commits(&CommitRange::All).len(), 3);
    }

    #[test]
    fn test_memory_source_commit_date() {
        let source = MemorySource::new()
            .commit("c1", "feat: thing", date("2025-03-05"))
            .undated_commit("c2", "fix: other");

        assert_eq!(source.commit_date("c1").as_deref(), Some("05-03-2025"));
        assert_eq!(source.commit_date("c2"), None);
        assert_eq!(source.commit_date("missing"), None);
    }

    #[test]
    fn test_source_through_reference() {
        let source = MemorySource::new().commit("c1", "feat: thing", date("2025-03-05"));
        let boxed: Box<dyn CommitSource> = Box::new(source);
        assert_eq!(boxed.list_commits(&CommitRange::All).len(), 1);
        assert_eq!((&boxed).commit_date("c1").as_deref(), Some("05-03-2025"));
    }
}
