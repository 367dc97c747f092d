//! Git types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A commit as seen by the changelog: hash, subject line and display date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Commit hash (full)
    pub hash: String,
    /// Commit subject (first line of the message)
    pub subject: String,
    /// Display-formatted commit date, once looked up
    pub date: Option<String>,
}

impl CommitRecord {
    /// Create a new record without a date
    pub fn new(hash: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            subject: subject.into(),
            date: None,
        }
    }

    /// Set the display date
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

/// First seven characters of a commit hash, or all of a shorter one
pub fn short_hash(hash: &str) -> &str {
    let end = hash.char_indices().nth(7).map_or(hash.len(), |(i, _)| i);
    &hash[..end]
}

/// Parse one `<hash> <subject>` line of `git log --format=%H %s` output.
///
/// Returns `None` for blank lines and lines without a space after the hash.
pub fn parse_log_line(line: &str) -> Option<CommitRecord> {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return None;
    }

    let (hash, subject) = line.split_once(' ')?;
    if hash.is_empty() {
        return None;
    }

    Some(CommitRecord::new(hash, subject))
}

/// Window of history to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitRange {
    /// Every commit reachable from HEAD
    All,
    /// Commits on or after the date
    Since(NaiveDate),
    /// Commits on or after `from` and strictly before `until`
    Between { from: NaiveDate, until: NaiveDate },
}

impl CommitRange {
    /// Lower bound, inclusive
    pub fn since(&self) -> Option<NaiveDate> {
        match self {
            Self::All => None,
            Self::Since(from) | Self::Between { from, .. } => Some(*from),
        }
    }

    /// Upper bound, exclusive
    pub fn until(&self) -> Option<NaiveDate> {
        match self {
            Self::Between { until, .. } => Some(*until),
            _ => None,
        }
    }

    /// Whether a commit made on `date` falls inside the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.since().map_or(true, |from| date >= from)
            && self.until().map_or(true, |until| date < until)
    }
}

impl std::fmt::Display for CommitRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all commits"),
            Self::Since(from) => write!(f, "since {}", from),
            Self::Between { from, until } => write!(f, "{} to {}", from, until),
        }
    }
}
