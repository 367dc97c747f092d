//! chronicle Git - commit history sources
//!
//! This crate lists commits for a date window and looks up per-commit
//! dates, either by spawning the git binary or through libgit2.

mod cli;
mod commits;
mod repository;
mod source;
pub mod types;

pub use cli::GitCli;
pub use repository::{GitRepo, Result};
pub use source::{CommitSource, MemorySource};
pub use types::{parse_log_line, short_hash, CommitRange, CommitRecord};
