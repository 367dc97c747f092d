//! End-to-end changelog updates
//!
//! Ties a [`CommitSource`] to the classifier and the merger. `update_unreleased`
//! is the flat mode, `update_monthly` the monthly mode.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, instrument};

use chronicle_core::config::ChangelogConfig;
use chronicle_core::error::ChangelogError;
use chronicle_core::{Result, SortOrder};
use chronicle_git::{CommitRange, CommitRecord, CommitSource};

use crate::classifier::{Classification, Classifier, DateRequirement};
use crate::merger::{read_document, ChangelogMerger, MergeMode, MergeOutcome};
use crate::month::previous_month;
use crate::release::latest_release_date;
use crate::types::CategorizedCommits;

/// Commits read from a source and their classification
#[derive(Debug, Clone, Serialize)]
pub struct Collection {
    /// Window that was read
    pub range: CommitRange,
    /// Number of commits the source returned
    pub seen: usize,
    #[serde(flatten)]
    pub classification: Classification,
}

/// Summary of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub path: PathBuf,
    pub range: CommitRange,
    /// Month heading, for monthly runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub commits_seen: usize,
    pub malformed: usize,
    pub undated: usize,
    pub outcome: MergeOutcome,
    pub written: bool,
}

impl RunReport {
    fn new(path: &Path, collection: Option<&Collection>, range: CommitRange, outcome: MergeOutcome, dry_run: bool) -> Self {
        let written = outcome.is_write() && !dry_run;
        Self {
            path: path.to_path_buf(),
            range,
            label: None,
            commits_seen: collection.map_or(0, |c| c.seen),
            malformed: collection.map_or(0, |c| c.classification.malformed),
            undated: collection.map_or(0, |c| c.classification.undated),
            outcome,
            written,
        }
    }

    fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Read and classify the commits in `range`.
///
/// Dates are looked up per commit when they are required or when the
/// classifier sorts by date.
#[instrument(skip(source, classifier))]
pub fn collect<S: CommitSource>(
    source: &S,
    classifier: &Classifier,
    range: &CommitRange,
    dates: DateRequirement,
) -> Collection {
    let mut records = source.list_commits(range);
    let seen = records.len();

    if dates == DateRequirement::Required || classifier.sort_order() != SortOrder::Source {
        fill_dates(source, &mut records);
    }

    let classification = classifier.categorize(&records, dates);
    Collection {
        range: *range,
        seen,
        classification,
    }
}

fn fill_dates<S: CommitSource>(source: &S, records: &mut [CommitRecord]) {
    for record in records.iter_mut().filter(|r| r.date.is_none()) {
        record.date = source.commit_date(&record.hash);
        if record.date.is_none() {
            debug!(hash = %record.hash, "no date for commit");
        }
    }
}

/// Window used when no explicit bounds are given: everything after the last
/// dated release in the document, or the whole history.
pub fn default_range(document: Option<&str>) -> CommitRange {
    match document.and_then(latest_release_date) {
        Some(date) => CommitRange::Since(date),
        None => CommitRange::All,
    }
}

/// Append flat category blocks under the Unreleased anchor
#[instrument(skip(source, config, path), fields(path = %path.display()))]
pub fn update_unreleased<S: CommitSource>(
    source: &S,
    config: &ChangelogConfig,
    path: &Path,
    range: Option<CommitRange>,
    dry_run: bool,
) -> Result<RunReport> {
    let existing = read_document(path)?;
    let range = range.unwrap_or_else(|| default_range(existing.as_deref()));
    info!(%range, "updating unreleased section");

    let classifier = Classifier::from_config(config);
    let collection = collect(source, &classifier, &range, DateRequirement::Optional);

    let merger = ChangelogMerger::from_config(config);
    let outcome = merger.apply_to_file(
        path,
        existing.as_deref(),
        &MergeMode::Flat,
        &collection.classification.commits,
        dry_run,
    )?;

    Ok(RunReport::new(path, Some(&collection), range, outcome, dry_run))
}

/// Add a subsection for the month before `today`
#[instrument(skip(source, config, path), fields(path = %path.display()))]
pub fn update_monthly<S: CommitSource>(
    source: &S,
    config: &ChangelogConfig,
    path: &Path,
    today: NaiveDate,
    dry_run: bool,
) -> Result<RunReport> {
    let window = previous_month(today);
    let range = CommitRange::Between {
        from: window.start,
        until: window.end,
    };
    info!(label = %window.label, %range, "updating monthly section");

    let existing = read_document(path)?.ok_or_else(|| ChangelogError::FileNotFound(path.to_path_buf()))?;

    // Anchor and duplicate checks first, so a finished month costs no git calls
    let merger = ChangelogMerger::from_config(config);
    let precheck = merger.merge_monthly(&existing, &window.label, &CategorizedCommits::new());
    if matches!(
        precheck,
        MergeOutcome::AnchorMissing | MergeOutcome::DuplicateSection { .. }
    ) {
        return Ok(RunReport::new(path, None, range, precheck, dry_run).with_label(window.label));
    }

    let classifier = Classifier::from_config(config);
    let collection = collect(source, &classifier, &range, DateRequirement::Required);

    let mode = MergeMode::Monthly {
        label: window.label.clone(),
    };
    let outcome = merger.apply_to_file(
        path,
        Some(&existing),
        &mode,
        &collection.classification.commits,
        dry_run,
    )?;

    Ok(RunReport::new(path, Some(&collection), range, outcome, dry_run).with_label(window.label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_core::Category;
    use chronicle_git::MemorySource;
    use std::fs;
    use tempfile::TempDir;

    const DOC: &str = "# CHANGELOG\n\n## [Unreleased]\n\n---\n\n## [1.0.0] - 2025-03-01\n\n### Added\n- first release\n";

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn source() -> MemorySource {
        MemorySource::new()
            .commit("c5", "feat(cli): monthly command", date("2025-04-02"))
            .commit("c4", "fix: crash on empty file", date("2025-03-20"))
            .commit("c3", "bump deps", date("2025-03-10"))
            .commit("c2", "feat(parser): support unicode escapes", date("2025-03-05"))
            .commit("c1", "docs: readme", date("2025-02-10"))
    }

    /// Rewrites the changelog while commits are being listed
    struct RewritingSource {
        inner: MemorySource,
        path: PathBuf,
        replacement: &'static str,
    }

    impl CommitSource for RewritingSource {
        fn list_commits(&self, range: &CommitRange) -> Vec<CommitRecord> {
            fs::write(&self.path, self.replacement).unwrap();
            self.inner.list_commits(range)
        }

        fn commit_date(&self, hash: &str) -> Option<String> {
            self.inner.commit_date(hash)
        }
    }

    fn setup(content: Option<&str>) -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("CHANGELOG.md");
        if let Some(content) = content {
            fs::write(&path, content).unwrap();
        }
        (temp, path)
    }

    #[test]
    fn test_default_range() {
        assert_eq!(default_range(None), CommitRange::All);
        assert_eq!(default_range(Some("## [Unreleased]\n")), CommitRange::All);
        assert_eq!(default_range(Some(DOC)), CommitRange::Since(date("2025-03-01")));
    }

    #[test]
    fn test_collect_counts() {
        let classifier = Classifier::new();
        let collection = collect(&source(), &classifier, &CommitRange::All, DateRequirement::Optional);

        assert_eq!(collection.seen, 5);
        assert_eq!(collection.classification.malformed, 1);
        assert_eq!(collection.classification.commits.len(), 4);
        // Source order sorting needs no date lookups
        assert!(collection.classification.commits.get(Category::Added)[0].date.is_none());
    }

    #[test]
    fn test_collect_fetches_dates_for_date_sort() {
        let classifier = Classifier::new().with_sort(SortOrder::Date, "%d-%m-%Y");
        let collection = collect(&source(), &classifier, &CommitRange::All, DateRequirement::Optional);

        let added = collection.classification.commits.get(Category::Added);
        assert_eq!(added[0].description, "parser: support unicode escapes");
        assert_eq!(added[0].date.as_deref(), Some("05-03-2025"));
        assert_eq!(added[1].description, "cli: monthly command");
    }

    #[test]
    fn test_update_unreleased_since_last_release() {
        let (_temp, path) = setup(Some(DOC));
        let report = update_unreleased(&source(), &ChangelogConfig::default(), &path, None, false).unwrap();

        assert_eq!(report.range, CommitRange::Since(date("2025-03-01")));
        assert_eq!(report.commits_seen, 4);
        assert_eq!(report.malformed, 1);
        assert!(report.written);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(
            "# CHANGELOG\n\n## [Unreleased]\n\n### Added\n- cli: monthly command\n- parser: support unicode escapes\n\n### Fixed\n- crash on empty file\n\n---\n"
        ));
        assert!(!text.contains("- readme"));
        assert!(text.ends_with("## [1.0.0] - 2025-03-01\n\n### Added\n- first release\n"));
    }

    #[test]
    fn test_update_unreleased_twice_appends_twice() {
        let (_temp, path) = setup(Some(DOC));
        let config = ChangelogConfig::default();
        update_unreleased(&source(), &config, &path, None, false).unwrap();
        update_unreleased(&source(), &config, &path, None, false).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("- crash on empty file\n").count(), 2);
        assert_eq!(text.matches("[Unreleased]").count(), 1);
    }

    #[test]
    fn test_update_unreleased_creates_missing_file() {
        let (_temp, path) = setup(None);
        let range = CommitRange::Between {
            from: date("2025-02-01"),
            until: date("2025-03-01"),
        };
        let report = update_unreleased(&source(), &ChangelogConfig::default(), &path, Some(range), false).unwrap();

        assert!(matches!(report.outcome, MergeOutcome::Created { entries: 1, .. }));
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# CHANGELOG\n"));
        assert!(text.ends_with("## [Unreleased]\n\n### Changed\n- readme\n\n"));
    }

    #[test]
    fn test_update_unreleased_empty_source_leaves_file() {
        let (_temp, path) = setup(Some(DOC));
        let report = update_unreleased(&MemorySource::new(), &ChangelogConfig::default(), &path, None, false).unwrap();

        assert_eq!(report.outcome, MergeOutcome::NothingToInsert);
        assert!(!report.written);
        assert_eq!(fs::read_to_string(&path).unwrap(), DOC);
    }

    #[test]
    fn test_update_unreleased_anchor_missing() {
        let doc = "# CHANGELOG\n\n## [1.0.0] - 2025-03-01\n";
        let (_temp, path) = setup(Some(doc));
        let report = update_unreleased(&source(), &ChangelogConfig::default(), &path, None, false).unwrap();

        assert_eq!(report.outcome, MergeOutcome::AnchorMissing);
        assert_eq!(fs::read_to_string(&path).unwrap(), doc);
    }

    #[test]
    fn test_update_unreleased_dry_run() {
        let (_temp, path) = setup(Some(DOC));
        let report = update_unreleased(&source(), &ChangelogConfig::default(), &path, None, true).unwrap();

        assert!(report.outcome.is_write());
        assert!(!report.written);
        assert_eq!(fs::read_to_string(&path).unwrap(), DOC);
    }

    #[test]
    fn test_update_monthly_inserts_previous_month() {
        let (_temp, path) = setup(Some(DOC));
        let report = update_monthly(&source(), &ChangelogConfig::default(), &path, date("2025-04-15"), false).unwrap();

        assert_eq!(report.label.as_deref(), Some("March 2025"));
        assert_eq!(report.commits_seen, 3);
        assert!(report.written);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(
            "# CHANGELOG\n\n## [Unreleased]\n\n### March 2025\n\n#### Added\n- parser: support unicode escapes [05-03-2025]\n\n#### Fixed\n- crash on empty file [20-03-2025]\n\n\n---\n"
        ));
    }

    #[test]
    fn test_update_monthly_second_run_is_noop() {
        let (_temp, path) = setup(Some(DOC));
        let config = ChangelogConfig::default();
        update_monthly(&source(), &config, &path, date("2025-04-15"), false).unwrap();
        let after_first = fs::read_to_string(&path).unwrap();

        let report = update_monthly(&source(), &config, &path, date("2025-04-30"), false).unwrap();
        assert_eq!(
            report.outcome,
            MergeOutcome::DuplicateSection {
                label: "March 2025".to_string()
            }
        );
        assert_eq!(report.commits_seen, 0);
        assert!(!report.written);
        assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
    }

    #[test]
    fn test_update_monthly_merges_the_checked_snapshot() {
        let (_temp, path) = setup(Some(DOC));
        let source = RewritingSource {
            inner: source(),
            path: path.clone(),
            replacement: "# other\n",
        };
        let report = update_monthly(&source, &ChangelogConfig::default(), &path, date("2025-04-15"), false).unwrap();

        assert!(matches!(report.outcome, MergeOutcome::Inserted { entries: 2, .. }));
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# CHANGELOG\n\n## [Unreleased]\n\n### March 2025\n"));
        assert!(text.ends_with("- first release\n"));
    }

    #[test]
    fn test_update_unreleased_merges_the_snapshot_it_ranged_from() {
        let (_temp, path) = setup(Some(DOC));
        let source = RewritingSource {
            inner: source(),
            path: path.clone(),
            replacement: "# CHANGELOG\n\n## [Unreleased]\n\n## [2.0.0] - 2025-04-01\n",
        };
        let report = update_unreleased(&source, &ChangelogConfig::default(), &path, None, false).unwrap();

        assert_eq!(report.range, CommitRange::Since(date("2025-03-01")));
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("## [1.0.0] - 2025-03-01\n"));
        assert!(!text.contains("[2.0.0]"));
    }

    #[test]
    fn test_update_monthly_missing_file() {
        let (_temp, path) = setup(None);
        let result = update_monthly(&source(), &ChangelogConfig::default(), &path, date("2025-04-15"), false);

        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_update_monthly_empty_month() {
        let (_temp, path) = setup(Some(DOC));
        let report = update_monthly(&source(), &ChangelogConfig::default(), &path, date("2025-07-01"), false).unwrap();

        assert_eq!(report.label.as_deref(), Some("June 2025"));
        assert_eq!(report.outcome, MergeOutcome::NothingToInsert);
        assert_eq!(fs::read_to_string(&path).unwrap(), DOC);
    }

    #[test]
    fn test_report_serializes() {
        let (_temp, path) = setup(Some(DOC));
        let report = update_monthly(&source(), &ChangelogConfig::default(), &path, date("2025-04-15"), true).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["label"], "March 2025");
        assert_eq!(json["outcome"]["outcome"], "inserted");
        assert_eq!(json["written"], false);
    }
}
