//! Date formatting shared by the panels and the CLI
//!
//! All timestamps are shown in UTC.

use crate::error::CoreError;
use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Format accepted and produced by the custom date fields
pub const FIELD_DATE_FORMAT: &str = "%Y-%m-%d";

/// Short day form used in panel titles: `Tue Oct 13 2026`
pub fn day_title(date: DateTime<Utc>) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Anomaly table form: `October 13th 2026, 3 pm`
pub fn table_date(date: DateTime<Utc>) -> String {
    format!(
        "{} {}{} {}, {}",
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year(),
        hour_of_day(date)
    )
}

/// Tooltip form: `October 13 2026, 3 pm`
pub fn tooltip_date(date: DateTime<Utc>) -> String {
    format!("{}, {}", date.format("%B %d %Y"), hour_of_day(date))
}

/// Custom date field form: `2026-10-13`
pub fn field_date(date: DateTime<Utc>) -> String {
    date.format(FIELD_DATE_FORMAT).to_string()
}

/// Parse a custom date field value as midnight UTC
pub fn parse_field_date(value: &str) -> Result<DateTime<Utc>, CoreError> {
    let invalid = || CoreError::InvalidValue {
        field: "date",
        value: value.to_string(),
    };

    NaiveDate::parse_from_str(value.trim(), FIELD_DATE_FORMAT)
        .map_err(|_| invalid())?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(invalid)
}

/// `3 pm`, `12 am`
fn hour_of_day(date: DateTime<Utc>) -> String {
    date.format("%-I %P").to_string()
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
