//! Release detection in an existing changelog

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

static RELEASE_HEADING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^##\s*\[(?P<version>[^\]]+)\]\s*-\s*(?P<date>\d{4}-\d{2}-\d{2})")
        .expect("Invalid regex")
});

/// Date of the most recent release, taken from the first dated version heading.
///
/// Matches `## [1.2.0] - 2024-05-01` and the `## [x.x.x] - YYYY-MM-DD`
/// placeholder form. Headings with an impossible date are skipped.
pub fn latest_release_date(document: &str) -> Option<NaiveDate> {
    RELEASE_HEADING_REGEX
        .captures_iter(document)
        .filter(|caps| !caps["version"].eq_ignore_ascii_case("unreleased"))
        .find_map(|caps| {
            let date = NaiveDate::parse_from_str(&caps["date"], "%Y-%m-%d").ok()?;
            debug!(version = &caps["version"], %date, "latest release");
            Some(date)
        })
}
