//! Commit classification
//!
//! Maps conventional commit types onto changelog categories and groups a
//! batch of commit records into [`CategorizedCommits`].

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, instrument};

use chronicle_core::config::ChangelogConfig;
use chronicle_core::{Category, SortOrder};
use chronicle_git::CommitRecord;

use crate::parser::{CommitParser, ConventionalParser};
use crate::types::{CategorizedCommits, CategorizedEntry};

/// Built-in commit type table. Anything not listed is `Changed`.
pub const DEFAULT_TYPES: &[(&str, Category)] = &[
    ("feat", Category::Added),
    ("fix", Category::Fixed),
    ("docs", Category::Changed),
    ("chore", Category::Changed),
    ("refactor", Category::Changed),
    ("style", Category::Changed),
    ("test", Category::Changed),
    ("perf", Category::Changed),
    ("ci", Category::Changed),
];

/// Category for a commit type using the built-in table
pub fn map_category(commit_type: &str) -> Category {
    DEFAULT_TYPES
        .iter()
        .find(|(name, _)| *name == commit_type)
        .map_or(Category::Changed, |(_, category)| *category)
}

/// Immutable type table: configured entries layered over [`DEFAULT_TYPES`]
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    extra: BTreeMap<String, Category>,
}

impl TypeTable {
    /// Table with only the built-in types
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with configured types taking precedence over built-ins
    pub fn with_types(extra: BTreeMap<String, Category>) -> Self {
        Self { extra }
    }

    /// Look up a commit type. Unknown types are `Changed`.
    pub fn category(&self, commit_type: &str) -> Category {
        self.extra
            .get(commit_type)
            .copied()
            .unwrap_or_else(|| map_category(commit_type))
    }
}

/// Whether records without a date are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRequirement {
    /// Keep undated records
    Optional,
    /// Drop undated records
    Required,
}

/// Result of classifying a batch
#[derive(Debug, Clone, Default, Serialize)]
pub struct Classification {
    /// Entries grouped by category
    pub commits: CategorizedCommits,
    /// Records whose subject did not parse
    pub malformed: usize,
    /// Records dropped for lacking a date
    pub undated: usize,
}

/// Groups commit records into changelog categories
pub struct Classifier {
    parser: Box<dyn CommitParser>,
    table: TypeTable,
    sort: SortOrder,
    date_format: String,
}

impl Classifier {
    /// Classifier with the built-in table, source order and `DD-MM-YYYY` dates
    pub fn new() -> Self {
        Self {
            parser: Box::new(ConventionalParser),
            table: TypeTable::new(),
            sort: SortOrder::Source,
            date_format: "%d-%m-%Y".to_string(),
        }
    }

    /// Classifier configured from the changelog section of the config
    pub fn from_config(config: &ChangelogConfig) -> Self {
        Self::new()
            .with_table(TypeTable::with_types(config.types.clone()))
            .with_sort(config.sort, &config.date_format)
    }

    /// Use a custom type table
    pub fn with_table(mut self, table: TypeTable) -> Self {
        self.table = table;
        self
    }

    /// Set the ordering within categories and the format dates are parsed with
    pub fn with_sort(mut self, sort: SortOrder, date_format: impl Into<String>) -> Self {
        self.sort = sort;
        self.date_format = date_format.into();
        self
    }

    /// Ordering applied within categories
    pub fn sort_order(&self) -> SortOrder {
        self.sort
    }

    /// Classify a batch of records
    #[instrument(skip(self, records), fields(record_count = records.len()))]
    pub fn categorize(&self, records: &[CommitRecord], dates: DateRequirement) -> Classification {
        let mut result = Classification::default();

        for record in records {
            let Some(parsed) = self.parser.parse(&record.subject) else {
                debug!(hash = %record.hash, subject = %record.subject, "not a conventional commit");
                result.malformed += 1;
                continue;
            };

            if dates == DateRequirement::Required && record.date.is_none() {
                debug!(hash = %record.hash, "dropping commit without a date");
                result.undated += 1;
                continue;
            }

            let category = self.table.category(&parsed.commit_type);
            result.commits.push(
                category,
                CategorizedEntry {
                    description: parsed.render_description(),
                    date: record.date.clone(),
                    hash: record.hash.clone(),
                },
            );
        }

        result.commits.sort(self.sort, &self.date_format);

        info!(
            entries = result.commits.len(),
            malformed = result.malformed,
            undated = result.undated,
            "classified commits"
        );
        result
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hash: &str, subject: &str, date: Option<&str>) -> CommitRecord {
        let record = CommitRecord::new(hash, subject);
        match date {
            Some(date) => record.with_date(date),
            None => record,
        }
    }

    #[test]
    fn test_map_category_table() {
        assert_eq!(map_category("feat"), Category::Added);
        assert_eq!(map_category("fix"), Category::Fixed);
        for token in ["docs", "chore", "refactor", "style", "test", "perf", "ci"] {
            assert_eq!(map_category(token), Category::Changed, "{}", token);
        }
    }

    #[test]
    fn test_map_category_defaults_to_changed() {
        assert_eq!(map_category("build"), Category::Changed);
        assert_eq!(map_category("Feat"), Category::Changed);
        assert_eq!(map_category(""), Category::Changed);
    }

    #[test]
    fn test_type_table_overrides() {
        let mut extra = BTreeMap::new();
        extra.insert("security".to_string(), Category::Security);
        extra.insert("chore".to_string(), Category::Removed);
        let table = TypeTable::with_types(extra);

        assert_eq!(table.category("security"), Category::Security);
        assert_eq!(table.category("chore"), Category::Removed);
        assert_eq!(table.category("feat"), Category::Added);
        assert_eq!(table.category("unknown"), Category::Changed);
    }

    #[test]
    fn test_categorize_groups_and_renders() {
        let records = vec![
            record("a1", "feat(parser): support unicode escapes", None),
            record("a2", "fix: crash on empty file", None),
            record("a3", "bump deps", None),
            record("a4", "docs: readme", None),
        ];

        let result = Classifier::new().categorize(&records, DateRequirement::Optional);

        assert_eq!(result.malformed, 1);
        assert_eq!(result.commits.len(), 3);
        assert_eq!(
            result.commits.get(Category::Added)[0].description,
            "parser: support unicode escapes"
        );
        assert_eq!(result.commits.get(Category::Fixed)[0].hash, "a2");
        assert_eq!(result.commits.get(Category::Changed)[0].description, "readme");
    }

    #[test]
    fn test_categorize_drops_undated_when_required() {
        let records = vec![
            record("a1", "feat: dated", Some("05-03-2025")),
            record("a2", "feat: undated", None),
        ];

        let result = Classifier::new().categorize(&records, DateRequirement::Required);
        assert_eq!(result.undated, 1);
        assert_eq!(result.commits.get(Category::Added).len(), 1);
        assert_eq!(
            result.commits.get(Category::Added)[0].date.as_deref(),
            Some("05-03-2025")
        );

        let result = Classifier::new().categorize(&records, DateRequirement::Optional);
        assert_eq!(result.undated, 0);
        assert_eq!(result.commits.get(Category::Added).len(), 2);
    }

    #[test]
    fn test_categorize_applies_sort() {
        let records = vec![
            record("a1", "fix: later", Some("10-03-2025")),
            record("a2", "fix: earlier", Some("02-03-2025")),
        ];

        let classifier = Classifier::new().with_sort(SortOrder::Date, "%d-%m-%Y");
        let result = classifier.categorize(&records, DateRequirement::Required);
        let fixed = result.commits.get(Category::Fixed);
        assert_eq!(fixed[0].description, "earlier");
        assert_eq!(fixed[1].description, "later");
    }

    #[test]
    fn test_from_config_uses_types() {
        let mut config = ChangelogConfig::default();
        config.types.insert("deprecate".to_string(), Category::Deprecated);

        let classifier = Classifier::from_config(&config);
        let result = classifier.categorize(
            &[record("a1", "deprecate(api): old endpoint", None)],
            DateRequirement::Optional,
        );
        assert_eq!(
            result.commits.get(Category::Deprecated)[0].description,
            "api: old endpoint"
        );
    }
}
