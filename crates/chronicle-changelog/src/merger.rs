//! Changelog document merger
//!
//! Splices rendered entries into the changelog text below the anchor line.
//! The flat mode appends a block on every run. The monthly mode adds one
//! `### <Month YYYY>` subsection per month and refuses to add it twice.
//!
//! Merging works on text only and reports a [`MergeOutcome`]. The file is
//! read once with [`read_document`]; [`ChangelogMerger::apply_to_file`]
//! merges that snapshot and hands the result to [`write_document`].

use std::fs::{self, Permissions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

use chronicle_core::config::{ChangelogConfig, DEFAULT_HEADER};
use chronicle_core::error::ChangelogError;
use chronicle_core::Result;

use crate::document::{find_line_containing, find_line_matching, has_heading, region_end, splice_after};
use crate::formatter::{render_flat, render_monthly};
use crate::types::CategorizedCommits;

/// Result of a merge attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MergeOutcome {
    /// Entries were spliced into an existing document
    Inserted {
        #[serde(skip)]
        text: String,
        entries: usize,
    },
    /// A new document was synthesized
    Created {
        #[serde(skip)]
        text: String,
        entries: usize,
    },
    /// The document has no anchor line
    AnchorMissing,
    /// The monthly section is already in the Unreleased region
    DuplicateSection { label: String },
    /// No entries to add
    NothingToInsert,
}

impl MergeOutcome {
    /// New document text, if anything is to be written
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Inserted { text, .. } | Self::Created { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Whether the document changes
    pub fn is_write(&self) -> bool {
        self.text().is_some()
    }

    /// Human readable summary
    pub fn message(&self, anchor: &str) -> String {
        match self {
            Self::Inserted { entries, .. } => format!("Added {} entries under {}", entries, anchor),
            Self::Created { entries, .. } => {
                format!("Created changelog with {} entries under {}", entries, anchor)
            }
            Self::AnchorMissing => format!("Could not find {} section", anchor),
            Self::DuplicateSection { label } => {
                format!("{} section already exists", label)
            }
            Self::NothingToInsert => "No new changes to add".to_string(),
        }
    }
}

/// How entries are merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeMode {
    /// Flat category blocks under the anchor; a missing file is created
    Flat,
    /// One dated subsection per month; the file must exist
    Monthly { label: String },
}

/// Merges categorized commits into changelog text
#[derive(Debug, Clone)]
pub struct ChangelogMerger {
    anchor: String,
    header: String,
}

impl ChangelogMerger {
    /// Merger with the given anchor token and the default header
    pub fn new(anchor: impl Into<String>) -> Self {
        Self {
            anchor: anchor.into(),
            header: DEFAULT_HEADER.to_string(),
        }
    }

    /// Merger configured from the changelog section of the config
    pub fn from_config(config: &ChangelogConfig) -> Self {
        Self::new(config.anchor.clone()).with_header(config.header.clone())
    }

    /// Header used when synthesizing a document
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Minimal document: header followed by an empty anchor section
    pub fn synthesize(&self) -> String {
        format!("{}\n\n## {}\n\n", self.header.trim_end(), self.anchor)
    }

    /// Flat append below the first line containing the anchor token.
    ///
    /// `None` means the document does not exist yet; a new one is
    /// synthesized and returned even when there are no entries.
    #[instrument(skip_all, fields(anchor = %self.anchor, entries = commits.len()))]
    pub fn merge_flat(&self, existing: Option<&str>, commits: &CategorizedCommits) -> MergeOutcome {
        let (text, created) = match existing {
            Some(text) => (text.to_string(), false),
            None => {
                debug!("synthesizing new changelog");
                (self.synthesize(), true)
            }
        };

        let Some(anchor) = find_line_containing(&text, &self.anchor) else {
            warn!("anchor line not found");
            return MergeOutcome::AnchorMissing;
        };

        let entries = commits.len();
        if created {
            let text = if entries == 0 {
                text
            } else {
                splice_after(&text, anchor, &render_flat(commits))
            };
            return MergeOutcome::Created { text, entries };
        }

        if entries == 0 {
            return MergeOutcome::NothingToInsert;
        }

        let text = splice_after(&text, anchor, &render_flat(commits));
        info!(entries, line = anchor.index, "flat block inserted");
        MergeOutcome::Inserted { text, entries }
    }

    /// Monthly subsection below the `## <anchor>` heading.
    ///
    /// Nothing changes when a `### <label>` line is already present between
    /// the anchor and the next `---` delimiter.
    #[instrument(skip_all, fields(anchor = %self.anchor, label = %label, entries = commits.len()))]
    pub fn merge_monthly(&self, existing: &str, label: &str, commits: &CategorizedCommits) -> MergeOutcome {
        let anchor = self
            .heading_pattern()
            .and_then(|pattern| find_line_matching(existing, &pattern));
        let Some(anchor) = anchor else {
            warn!("anchor heading not found");
            return MergeOutcome::AnchorMissing;
        };

        let end = region_end(existing, anchor.end);
        let heading = format!("### {}", label);
        if has_heading(existing, anchor.end, end, &heading) {
            info!("monthly section already exists");
            return MergeOutcome::DuplicateSection {
                label: label.to_string(),
            };
        }

        let entries = commits.len();
        if entries == 0 {
            return MergeOutcome::NothingToInsert;
        }

        let text = splice_after(existing, anchor, &render_monthly(label, commits));
        info!(entries, line = anchor.index, "monthly section inserted");
        MergeOutcome::Inserted { text, entries }
    }

    /// Merge into `existing`, the text previously read from `path`, and
    /// write the result back unless `dry_run`
    #[instrument(skip(self, path, existing, commits), fields(path = %path.display()))]
    pub fn apply_to_file(
        &self,
        path: &Path,
        existing: Option<&str>,
        mode: &MergeMode,
        commits: &CategorizedCommits,
        dry_run: bool,
    ) -> Result<MergeOutcome> {
        let outcome = match mode {
            MergeMode::Flat => self.merge_flat(existing, commits),
            MergeMode::Monthly { label } => {
                let text = existing.ok_or_else(|| ChangelogError::FileNotFound(path.to_path_buf()))?;
                self.merge_monthly(text, label, commits)
            }
        };

        if let Some(text) = outcome.text() {
            if dry_run {
                debug!("dry run, not writing");
            } else {
                write_document(path, text)?;
            }
        }

        Ok(outcome)
    }

    fn heading_pattern(&self) -> Option<Regex> {
        Regex::new(&format!("## {}", regex::escape(&self.anchor))).ok()
    }
}

/// Document text, or `None` when the file does not exist
pub fn read_document(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ChangelogError::Io(e).into()),
    }
}

/// Replace the document through a temporary file next to it.
///
/// A symlinked changelog is written through to its target. The existing
/// file's permissions carry over; a new file gets `0644` on unix.
pub fn write_document(path: &Path, text: &str) -> Result<()> {
    let write_failed = |reason: String| ChangelogError::WriteFailed {
        path: path.to_path_buf(),
        reason,
    };

    let target = resolve_target(path).map_err(|e| write_failed(e.to_string()))?;
    let permissions = match fs::metadata(&target) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(e) if e.kind() == ErrorKind::NotFound => new_file_permissions(),
        Err(e) => return Err(write_failed(e.to_string()).into()),
    };

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| write_failed(e.to_string()))?;
    file.write_all(text.as_bytes())
        .map_err(|e| write_failed(e.to_string()))?;
    if let Some(permissions) = permissions {
        file.as_file()
            .set_permissions(permissions)
            .map_err(|e| write_failed(e.to_string()))?;
    }
    file.persist(&target)
        .map_err(|e| write_failed(e.error.to_string()))?;

    info!(path = %target.display(), bytes = text.len(), "changelog written");
    Ok(())
}

/// File the write lands on: symlinks resolved, missing paths kept as given
fn resolve_target(path: &Path) -> std::io::Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(resolved) => Ok(resolved),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}
