//! chronicle Core - shared foundations for the chronicle changelog tool
//!
//! This crate provides the error types, configuration loading and the
//! changelog category model used by the git and changelog crates.

pub mod config;
pub mod error;
pub mod types;

pub use error::{ChronicleError, Result};
pub use types::{Category, SortOrder};
