//! Due-date parsing.
//!
//! Job exports mix day-first dates with and without a 12-hour time, and
//! ISO-style dates with a 24-hour time. Formats are tried in order and the
//! first match wins.
//!
//! Two-digit years `69..=99` land in the 1900s and `00..=68` in the 2000s.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::error::{PriorityError, Result};

/// Formats carrying a time of day.
const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%y %I:%M:%S %p", // 01/07/24 11:26:45 AM
    "%d/%m/%y %I:%M %p",    // 01/07/24 11:26 AM
    "%d/%m/%Y %I:%M:%S %p", // 01/07/2024 11:26:45 AM
    "%d/%m/%Y %I:%M %p",    // 01/07/2024 11:26 AM
];

/// Date-only formats, parsed as midnight.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%y", // 01/07/24
    "%d/%m/%Y", // 01/07/2024
];

const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S", // 2024-07-01 11:26:45
    "%Y-%m-%d %H:%M",    // 2024-07-01 11:26
];

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a due-date string into a comparable instant.
///
/// Surrounding whitespace is ignored.
///
/// # Examples
///
/// ```
/// use job_priority::timestamp::parse_due;
///
/// let a = parse_due("01/07/2024 11:26 AM").unwrap();
/// let b = parse_due("2024-07-01 11:26").unwrap();
/// assert_eq!(a, b);
/// assert!(parse_due("next tuesday").is_err());
/// ```
pub fn parse_due(input: &str) -> Result<NaiveDateTime> {
    let s = input.trim();

    // %Y accepts "24" as year 24, so the two-digit forms are tried first.
    // %y never matches a four-digit year.
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| {
            NaiveDateTime::parse_from_str(s, fmt)
                .ok()
                .map(|dt| pivot_century(dt, fmt))
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| {
                    NaiveDate::parse_from_str(s, fmt)
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                        .map(|dt| pivot_century(dt, fmt))
                })
        })
        .or_else(|| {
            ISO_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(s, ISO_DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| PriorityError::DateParse {
            input: s.to_string(),
        })
}

/// Re-centres a year parsed with `%y` on the 1969..=2068 window.
fn pivot_century(dt: NaiveDateTime, fmt: &str) -> NaiveDateTime {
    if !fmt.contains("%y") {
        return dt;
    }
    let yy = dt.year().rem_euclid(100);
    let year = if yy <= 68 { 2000 + yy } else { 1900 + yy };
    dt.with_year(year).unwrap_or(dt)
}

/// Parses an optional cell: empty text yields `Ok(None)`.
pub fn parse_optional_due(input: &str) -> Result<Option<NaiveDateTime>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_due(input).map(Some)
}
