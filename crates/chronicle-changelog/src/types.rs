//! Changelog types

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use chronicle_core::{Category, SortOrder};

/// A commit subject split into its conventional parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCommit {
    /// Commit type (feat, fix, ...), verbatim
    pub commit_type: String,
    /// Scope inside the parentheses, if any
    pub scope: Option<String>,
    /// Everything after `": "`
    pub description: String,
}

impl ParsedCommit {
    /// Description as it appears in the changelog, prefixed by the scope
    pub fn render_description(&self) -> String {
        match &self.scope {
            Some(scope) => format!("{}: {}", scope, self.description),
            None => self.description.clone(),
        }
    }
}

/// One line of the changelog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedEntry {
    /// Rendered description
    pub description: String,
    /// Display date of the commit, when known
    pub date: Option<String>,
    /// Hash of the originating commit
    pub hash: String,
}

/// Entries grouped by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedCommits {
    buckets: BTreeMap<Category, Vec<CategorizedEntry>>,
}

impl CategorizedCommits {
    /// Create an empty grouping
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to a category, keeping insertion order
    pub fn push(&mut self, category: Category, entry: CategorizedEntry) {
        self.buckets.entry(category).or_default().push(entry);
    }

    /// Entries of one category
    pub fn get(&self, category: Category) -> &[CategorizedEntry] {
        self.buckets.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty categories in rendering order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &'_ [CategorizedEntry])> + '_ {
        Category::ALL
            .into_iter()
            .map(|category| (category, self.get(category)))
            .filter(|(_, entries)| !entries.is_empty())
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Check if there is nothing to write
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reorder every bucket.
    ///
    /// `Date` parses entries with `date_format`; entries that do not parse
    /// keep their relative order after the ones that do. `Lexical` compares
    /// the raw strings, which is only chronological for year-first formats.
    pub fn sort(&mut self, order: SortOrder, date_format: &str) {
        match order {
            SortOrder::Source => {}
            SortOrder::Lexical => {
                for entries in self.buckets.values_mut() {
                    entries.sort_by(|a, b| a.date.cmp(&b.date));
                }
            }
            SortOrder::Date => {
                for entries in self.buckets.values_mut() {
                    entries.sort_by_key(|entry| {
                        let parsed = entry
                            .date
                            .as_deref()
                            .and_then(|d| NaiveDate::parse_from_str(d, date_format).ok());
                        (parsed.is_none(), parsed)
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(description: &str, date: Option<&str>) -> CategorizedEntry {
        CategorizedEntry {
            description: description.to_string(),
            date: date.map(str::to_string),
            hash: format!("{}-hash", description),
        }
    }

    #[test]
    fn test_render_description_with_scope() {
        let parsed = ParsedCommit {
            commit_type: "feat".to_string(),
            scope: Some("parser".to_string()),
            description: "support unicode escapes".to_string(),
        };
        assert_eq!(parsed.render_description(), "parser: support unicode escapes");
    }

    #[test]
    fn test_render_description_without_scope() {
        let parsed = ParsedCommit {
            commit_type: "fix".to_string(),
            scope: None,
            description: "handle edge case".to_string(),
        };
        assert_eq!(parsed.render_description(), "handle edge case");
    }

    #[test]
    fn test_iter_uses_category_order() {
        let mut commits = CategorizedCommits::new();
        commits.push(Category::Removed, entry("drop api", None));
        commits.push(Category::Added, entry("new api", None));
        commits.push(Category::Fixed, entry("crash", None));

        let order: Vec<Category> = commits.iter().map(|(c, _)| c).collect();
        assert_eq!(order, vec![Category::Added, Category::Fixed, Category::Removed]);
        assert_eq!(commits.len(), 3);
        assert!(commits.get(Category::Security).is_empty());
    }

    #[test]
    fn test_lexical_sort_is_not_chronological_for_day_first_dates() {
        let mut commits = CategorizedCommits::new();
        commits.push(Category::Added, entry("march", Some("15-03-2025")));
        commits.push(Category::Added, entry("january", Some("20-01-2025")));

        commits.sort(SortOrder::Lexical, "%d-%m-%Y");
        let names: Vec<&str> = commits
            .get(Category::Added)
            .iter()
            .map(|e| e.description.as_str())
            .collect();
        assert_eq!(names, vec!["march", "january"]);
    }

    #[test]
    fn test_date_sort_is_chronological() {
        let mut commits = CategorizedCommits::new();
        commits.push(Category::Added, entry("march", Some("15-03-2025")));
        commits.push(Category::Added, entry("unknown", Some("sometime")));
        commits.push(Category::Added, entry("december", Some("31-12-2024")));
        commits.push(Category::Added, entry("january", Some("20-01-2025")));

        commits.sort(SortOrder::Date, "%d-%m-%Y");
        let names: Vec<&str> = commits
            .get(Category::Added)
            .iter()
            .map(|e| e.description.as_str())
            .collect();
        assert_eq!(names, vec!["december", "january", "march", "unknown"]);
    }

    #[test]
    fn test_source_sort_keeps_order() {
        let mut commits = CategorizedCommits::new();
        commits.push(Category::Fixed, entry("b", Some("02-01-2025")));
        commits.push(Category::Fixed, entry("a", Some("01-01-2025")));

        commits.sort(SortOrder::Source, "%d-%m-%Y");
        assert_eq!(commits.get(Category::Fixed)[0].description, "b");
    }
}
