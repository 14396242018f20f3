//! Date normalization for raw milestone cells.
//!
//! Cells arrive as whatever the spreadsheet held: explicit dates in assorted
//! formats, fiscal-quarter shorthand like `2025Q3`, or junk. Everything
//! unparseable becomes `None` ("milestone absent"); this function never
//! reports an error.
//!
//! Fiscal-quarter shorthand takes priority over generic date parsing for
//! every milestone kind, and a quarter maps to its **last** calendar day: a
//! quarter commitment is due at quarter-end, not quarter-start.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// Date formats attempted in order, after the quarter pattern fails.
/// Month-first wins over day-first for ambiguous slash dates.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%b-%Y",
    "%b %d, %Y",
];

/// Timestamp formats whose time-of-day component is discarded.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];

struct CellPatterns {
    /// `<4-digit year> ... Q<1-4>` with any separator between year and
    /// quarter token, e.g. `2025Q3`, `2025 Q3`, `FY2025-Q3`.
    fiscal_quarter: Regex,
}

fn patterns() -> &'static CellPatterns {
    static PATTERNS: OnceLock<CellPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| CellPatterns {
        fiscal_quarter: Regex::new(r"(\d{4}).*Q([1-4])").unwrap(),
    })
}

/// Normalize one raw milestone cell into a calendar date.
///
/// Null, blank, and unparseable values all yield `None`.
pub fn normalize(raw: Option<&str>) -> Option<NaiveDate> {
    let value = raw?.trim();
    if value.is_empty() {
        return None;
    }
    let value = value.to_uppercase();
    parse_quarter(&value).or_else(|| parse_date(&value))
}

/// Fiscal-quarter shorthand, mapped to the quarter's last calendar day.
pub fn parse_quarter(value: &str) -> Option<NaiveDate> {
    let caps = patterns().fiscal_quarter.captures(value)?;
    let year: i32 = caps[1].parse().ok()?;
    let quarter: u32 = caps[2].parse().ok()?;
    quarter_end(year, quarter)
}

/// Generic date parsing across the accepted formats.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.date());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .ok()
}

fn quarter_end(year: i32, quarter: u32) -> Option<NaiveDate> {
    let (month, day) = match quarter {
        1 => (3, 31),
        2 => (6, 30),
        3 => (9, 30),
        4 => (12, 31),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}
