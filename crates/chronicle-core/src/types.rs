//! Core types shared across chronicle crates

use serde::{Deserialize, Serialize};

/// A changelog category, in the order sections are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// New functionality
    Added,
    /// Bug fixes
    Fixed,
    /// Everything else that changed
    Changed,
    /// Security fixes
    Security,
    /// Soon-to-be removed features
    Deprecated,
    /// Removed features
    Removed,
}

impl Category {
    /// All categories in rendering order
    pub const ALL: [Category; 6] = [
        Self::Added,
        Self::Fixed,
        Self::Changed,
        Self::Security,
        Self::Deprecated,
        Self::Removed,
    ];

    /// Returns the heading text for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "Added",
            Self::Fixed => "Fixed",
            Self::Changed => "Changed",
            Self::Security => "Security",
            Self::Deprecated => "Deprecated",
            Self::Removed => "Removed",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "added" => Ok(Self::Added),
            "fixed" => Ok(Self::Fixed),
            "changed" => Ok(Self::Changed),
            "security" => Ok(Self::Security),
            "deprecated" => Ok(Self::Deprecated),
            "removed" => Ok(Self::Removed),
            _ => Err(format!("Unknown changelog category: {}", s)),
        }
    }
}

/// Ordering applied to entries within a category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Keep the order the commit source returned
    #[default]
    Source,
    /// Ascending by parsed date
    Date,
    /// Ascending by raw date string
    Lexical,
}

impl SortOrder {
    /// Returns the string representation of the sort order
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Date => "date",
            Self::Lexical => "lexical",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
