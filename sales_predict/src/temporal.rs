//! Calendar feature derivation from observation dates

use chrono::{Datelike, NaiveDate};

/// Calendar features for a single date, matching the numeric columns the
/// model was trained on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarFeatures {
    pub year: f64,
    pub month: f64,
    pub day: f64,
    /// ISO weekday with 0 = Monday
    pub weekday: f64,
    /// 1.0 when the weekday is Saturday or Sunday
    pub is_weekend: f64,
}

impl CalendarFeatures {
    /// Feature values keyed by their trained column names
    pub fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("year", self.year),
            ("month", self.month),
            ("day", self.day),
            ("weekday", self.weekday),
            ("is_weekend", self.is_weekend),
        ]
    }
}

/// Derive calendar features for a date. Deterministic and pure.
pub fn calendar_features(date: NaiveDate) -> CalendarFeatures {
    let weekday = date.weekday().num_days_from_monday();

    CalendarFeatures {
        year: f64::from(date.year()),
        month: f64::from(date.month()),
        day: f64::from(date.day()),
        weekday: f64::from(weekday),
        is_weekend: if weekday >= 5 { 1.0 } else { 0.0 },
    }
}
