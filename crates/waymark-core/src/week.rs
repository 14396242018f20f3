//! ISO week bucketing.
//!
//! Milestone dates land on a shared categorical axis of ISO-8601 week labels
//! (`2025-W23`). Weeks start on Monday and week 1 is the week containing the
//! year's first Thursday, so two dates in the same ISO week share a label
//! even across a Gregorian month or year boundary. Labels are zero-padded
//! and year-prefixed; lexicographic order on the strings coincides with
//! chronological order, which `WeekAxis` relies on.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// WeekLabel
// ============================================================================

/// One ISO-8601 week (year plus week number).
///
/// Fields are private so every value held is a week that actually exists in
/// its ISO year; `monday()` can therefore never fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct WeekLabel {
    year: i32,
    week: u32,
}

impl WeekLabel {
    /// Build a label from an ISO year and week number.
    ///
    /// Returns `None` when that week number does not exist in the ISO year
    /// (years have 52 or 53 weeks).
    pub fn new(year: i32, week: u32) -> Option<Self> {
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).map(|_| Self { year, week })
    }

    /// The ISO week containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// ISO week-numbering year (differs from the Gregorian year near
    /// January 1).
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Week number within the ISO year, 1-based.
    pub fn week(&self) -> u32 {
        self.week
    }

    /// Monday of this week.
    pub fn monday(&self) -> NaiveDate {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
            .expect("WeekLabel always holds a valid ISO week")
    }

    /// The week immediately after this one.
    pub fn succ(&self) -> Self {
        Self::from_date(self.monday() + chrono::Duration::days(7))
    }

    /// Every week from `start` through `end`, inclusive.
    ///
    /// Empty when `start` is after `end`.
    pub fn span_inclusive(start: Self, end: Self) -> Vec<Self> {
        let mut weeks = Vec::new();
        let mut current = start;
        while current <= end {
            weeks.push(current);
            current = current.succ();
        }
        weeks
    }
}

impl fmt::Display for WeekLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

impl From<WeekLabel> for String {
    fn from(label: WeekLabel) -> Self {
        label.to_string()
    }
}

/// Error parsing a week label string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid week label: {0}")]
pub struct WeekLabelError(String);

impl FromStr for WeekLabel {
    type Err = WeekLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, week) = s
            .split_once("-W")
            .ok_or_else(|| WeekLabelError(s.to_string()))?;
        let year: i32 = year.parse().map_err(|_| WeekLabelError(s.to_string()))?;
        let week: u32 = week.parse().map_err(|_| WeekLabelError(s.to_string()))?;
        Self::new(year, week).ok_or_else(|| WeekLabelError(s.to_string()))
    }
}

impl TryFrom<String> for WeekLabel {
    type Error = WeekLabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Format a date as its ISO week label, `{ISOYear}-W{ISOWeek:02}`.
pub fn week_label(date: NaiveDate) -> String {
    WeekLabel::from_date(date).to_string()
}

// ============================================================================
// WeekAxis
// ============================================================================

/// The shared categorical axis: every distinct week label touched by the
/// data, sorted ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekAxis {
    weeks: Vec<WeekLabel>,
}

impl WeekAxis {
    /// Collect, sort, and dedup labels into an axis.
    pub fn build(labels: impl IntoIterator<Item = WeekLabel>) -> Self {
        let mut weeks: Vec<WeekLabel> = labels.into_iter().collect();
        weeks.sort_unstable();
        weeks.dedup();
        Self { weeks }
    }

    /// Chronological index of `label`, if present.
    pub fn position(&self, label: WeekLabel) -> Option<usize> {
        self.weeks.binary_search(&label).ok()
    }

    /// Axis labels strictly between `start` and `end`, in axis order.
    ///
    /// `None` when either endpoint is missing from the axis; empty when the
    /// endpoints are identical or adjacent.
    pub fn between(&self, start: WeekLabel, end: WeekLabel) -> Option<&[WeekLabel]> {
        let lo = self.position(start)?;
        let hi = self.position(end)?;
        if lo + 1 >= hi {
            return Some(&[]);
        }
        Some(&self.weeks[lo + 1..hi])
    }

    /// The sorted weeks.
    pub fn weeks(&self) -> &[WeekLabel] {
        &self.weeks
    }

    /// Labels as display strings, for the figure contract.
    pub fn labels(&self) -> Vec<String> {
        self.weeks.iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
