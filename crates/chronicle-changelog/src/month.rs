//! Calendar month windows

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// A calendar month as a half-open date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthWindow {
    /// Month name and year, e.g. `March 2025`
    pub label: String,
    /// First day of the month
    pub start: NaiveDate,
    /// First day of the following month (exclusive)
    pub end: NaiveDate,
}

/// The month before the one containing `today`
pub fn previous_month(today: NaiveDate) -> MonthWindow {
    let end = today - Duration::days(i64::from(today.day0()));
    let last_of_previous = end - Duration::days(1);
    let start = last_of_previous - Duration::days(i64::from(last_of_previous.day0()));

    MonthWindow {
        label: start.format("%B %Y").to_string(),
        start,
        end,
    }
}
