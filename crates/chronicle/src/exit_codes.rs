//! Exit codes for the CLI

/// The changelog has no anchor line to insert under
pub const CHANGELOG_ERROR: i32 = 3;
