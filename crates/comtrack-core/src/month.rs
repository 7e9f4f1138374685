//! # Month Keys: Calendar-Month Bucket Identifiers
//!
//! Defines `MonthKey`, the `YYYY-MM` aggregation key used by the rollup
//! engine and the reporting calendar.
//!
//! ## Ordering Invariant
//!
//! Years are restricted to `0..=9999` and always rendered with four digits,
//! months with two. Under that restriction the derived `Ord` (year, then
//! month) coincides with the lexicographic order of the rendered strings,
//! so a key range filter gives the same answer whether it is evaluated on
//! `MonthKey` values or on their `YYYY-MM` text.
//!
//! Parsing is strict: exactly `YYYY-MM`, nothing before or after.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ComtrackError;

const MAX_YEAR: i32 = 9999;

/// A calendar month, rendered and parsed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Build a key from a year and a 1-based month.
    ///
    /// # Errors
    ///
    /// Returns [`ComtrackError::InvalidMonth`] when the year is outside
    /// `0..=9999` or the month outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Result<Self, ComtrackError> {
        if !(0..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
            return Err(ComtrackError::InvalidMonth(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`, or `None` for years outside `0..=9999`.
    pub fn from_date(date: NaiveDate) -> Option<Self> {
        Self::new(date.year(), date.month()).ok()
    }

    /// The current UTC calendar month.
    pub fn current() -> Self {
        let today = Utc::now().date_naive();
        // chrono's supported range never exceeds four-digit years in practice.
        Self::from_date(today).unwrap_or(Self {
            year: MAX_YEAR,
            month: 12,
        })
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The 1-based month of the year.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// January of this key's year.
    pub fn start_of_year(&self) -> Self {
        Self {
            year: self.year,
            month: 1,
        }
    }

    /// Move by `delta` months (negative goes back), crossing year
    /// boundaries. Returns `None` if the result leaves `0000-01..=9999-12`.
    pub fn checked_add_months(&self, delta: i64) -> Option<Self> {
        let index = i64::from(self.year) * 12 + i64::from(self.month - 1);
        let shifted = index.checked_add(delta)?;
        if shifted < 0 {
            return None;
        }
        let year = i32::try_from(shifted / 12).ok()?;
        let month = u32::try_from(shifted % 12).ok()? + 1;
        Self::new(year, month).ok()
    }

    /// The preceding month, or `None` at `0000-01`.
    pub fn prev(&self) -> Option<Self> {
        self.checked_add_months(-1)
    }

    /// The following month, or `None` at `9999-12`.
    pub fn next(&self) -> Option<Self> {
        self.checked_add_months(1)
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ComtrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ComtrackError::InvalidMonth(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }
        let (year, month) = (&s[..4], &s[5..]);
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for MonthKey {
    type Error = ComtrackError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}
