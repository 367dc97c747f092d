//! chronicle Changelog - commit classification and changelog merging
//!
//! This crate turns conventional commit subjects into categorized entries
//! and splices them into a markdown changelog below its Unreleased anchor.

pub mod classifier;
pub mod document;
pub mod formatter;
pub mod merger;
pub mod month;
pub mod parser;
pub mod release;
pub mod types;
pub mod workflow;

pub use classifier::{map_category, Classification, Classifier, DateRequirement, TypeTable};
pub use merger::{ChangelogMerger, MergeMode, MergeOutcome};
pub use month::{previous_month, MonthWindow};
pub use parser::{CommitParser, ConventionalParser};
pub use release::latest_release_date;
pub use types::{CategorizedCommits, CategorizedEntry, ParsedCommit};
pub use workflow::{collect, update_monthly, update_unreleased, Collection, RunReport};
