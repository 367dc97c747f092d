//! Commit history operations

use chrono::{DateTime, FixedOffset, Local, TimeZone};
use git2::{Oid, Sort};
use tracing::{debug, info, instrument, warn};

use crate::repository::{GitRepo, Result};
use crate::source::CommitSource;
use crate::types::{CommitRange, CommitRecord};

impl GitRepo {
    /// Walk HEAD and collect commits inside the range, newest first
    #[instrument(skip(self), fields(path = %self.path().display()))]
    pub fn commits_in_range(&self, range: &CommitRange) -> Result<Vec<CommitRecord>> {
        let head = self.head_commit()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head.id())?;

        let mut commits = Vec::new();

        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            let Some(time) = commit_time(&commit) else {
                debug!(hash = %commit.id(), "skipping commit with unrepresentable time");
                continue;
            };
            if !range.contains(time.date_naive()) {
                continue;
            }
            let subject = commit.summary().unwrap_or_default().to_string();
            commits.push(CommitRecord::new(commit.id().to_string(), subject));
        }

        info!(%range, count = commits.len(), "walked commit history");
        Ok(commits)
    }

    /// Format a commit's committer date with the configured display format.
    ///
    /// The date is shown in the committer's own offset, as `git log
    /// --date=format:` does.
    pub fn format_commit_date(&self, hash: &str) -> Result<Option<String>> {
        let oid = Oid::from_str(hash)?;
        let commit = self.repo.find_commit(oid)?;
        Ok(committer_time(&commit).map(|time| time.format(&self.date_format).to_string()))
    }
}

/// Commit time in local time, for range checks
fn commit_time(commit: &git2::Commit<'_>) -> Option<DateTime<Local>> {
    Local.timestamp_opt(commit.time().seconds(), 0).single()
}

/// Commit time in the offset it was recorded with
fn committer_time(commit: &git2::Commit<'_>) -> Option<DateTime<FixedOffset>> {
    let time = commit.time();
    FixedOffset::east_opt(time.offset_minutes() * 60)?
        .timestamp_opt(time.seconds(), 0)
        .single()
}

impl CommitSource for GitRepo {
    fn list_commits(&self, range: &CommitRange) -> Vec<CommitRecord> {
        self.commits_in_range(range).unwrap_or_else(|e| {
            warn!(error = %e, %range, "commit history unavailable, treating as empty");
            Vec::new()
        })
    }

    fn commit_date(&self, hash: &str) -> Option<String> {
        self.format_commit_date(hash).unwrap_or_else(|e| {
            warn!(hash, error = %e, "could not look up commit date");
            None
        })
    }
}
