//! Conventional Commits parser
//!
//! Accepts `<type>[(<scope>)]: <description>` where the type is made of word
//! characters and the colon-space separator is mandatory.

use regex::Regex;
use std::sync::LazyLock;

use super::CommitParser;
use crate::types::ParsedCommit;

static CONVENTIONAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>\w+)(?:\((?P<scope>[^)]+)\))?: (?P<description>.+)$")
        .expect("Invalid regex")
});

/// Parser for Conventional Commits subjects
#[derive(Debug, Clone, Copy, Default)]
pub struct ConventionalParser;

impl CommitParser for ConventionalParser {
    fn parse(&self, subject: &str) -> Option<ParsedCommit> {
        let caps = CONVENTIONAL_REGEX.captures(subject)?;

        Some(ParsedCommit {
            commit_type: caps.name("type")?.as_str().to_string(),
            scope: caps.name("scope").map(|m| m.as_str().to_string()),
            description: caps.name("description")?.as_str().to_string(),
        })
    }
}
