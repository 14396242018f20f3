//! Relative-time annotations against an injected "now".
//!
//! All arithmetic works on `NaiveDate`, so the reference instant is a date
//! normalized to midnight. Callers always inject "now" explicitly; nothing
//! in this module reads the system clock.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;

/// Which side of "now" a date falls on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeDirection {
    Past,
    Today,
    Future,
}

/// Signed distance between a reference date and a milestone date.
///
/// `weeks` is the exact ratio `days / 7.0`, not a calendar-week count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelativeTime {
    pub days: i64,
    pub weeks: f64,
    pub direction: TimeDirection,
}

impl RelativeTime {
    /// Distance from `reference_now` to `date` (positive days = future).
    pub fn between(reference_now: NaiveDate, date: NaiveDate) -> Self {
        let days = (date - reference_now).num_days();
        let direction = match days.cmp(&0) {
            Ordering::Greater => TimeDirection::Future,
            Ordering::Equal => TimeDirection::Today,
            Ordering::Less => TimeDirection::Past,
        };
        Self {
            days,
            weeks: days as f64 / 7.0,
            direction,
        }
    }

    /// Human-readable phrase: `in 7 days (1.0 weeks)`, `today`, or
    /// `7 days ago (1.0 weeks)`. Day and week magnitudes always appear
    /// together.
    pub fn phrase(&self) -> String {
        match self.direction {
            TimeDirection::Future => format!("in {} days ({:.1} weeks)", self.days, self.weeks),
            TimeDirection::Today => "today".to_string(),
            TimeDirection::Past => {
                format!("{} days ago ({:.1} weeks)", -self.days, self.weeks.abs())
            }
        }
    }
}

impl fmt::Display for RelativeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.phrase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn future_past_today() {
        let now = date(2025, 6, 1);

        let future = RelativeTime::between(now, date(2025, 6, 8));
        assert_eq!(future.days, 7);
        assert!((future.weeks - 1.0).abs() < f64::EPSILON);
        assert_eq!(future.direction, TimeDirection::Future);

        let past = RelativeTime::between(now, date(2025, 5, 25));
        assert_eq!(past.days, -7);
        assert_eq!(past.direction, TimeDirection::Past);

        let today = RelativeTime::between(now, now);
        assert_eq!(today.days, 0);
        assert_eq!(today.direction, TimeDirection::Today);
    }

    #[test]
    fn phrases_distinguish_directions() {
        let now = date(2025, 6, 1);
        assert_eq!(
            RelativeTime::between(now, date(2025, 6, 8)).phrase(),
            "in 7 days (1.0 weeks)"
        );
        assert_eq!(
            RelativeTime::between(now, date(2025, 5, 25)).phrase(),
            "7 days ago (1.0 weeks)"
        );
        assert_eq!(RelativeTime::between(now, now).phrase(), "today");
    }

    #[test]
    fn weeks_is_a_ratio_not_calendar_weeks() {
        let now = date(2025, 6, 1);
        let r = RelativeTime::between(now, date(2025, 6, 11));
        assert_eq!(r.days, 10);
        assert!((r.weeks - 10.0 / 7.0).abs() < 1e-9);
        assert_eq!(r.phrase(), "in 10 days (1.4 weeks)");
    }

    #[test]
    fn display_matches_phrase() {
        let now = date(2025, 6, 1);
        let r = RelativeTime::between(now, date(2025, 7, 1));
        assert_eq!(r.to_string(), r.phrase());
    }
}
