//! # Reporting Calendar
//!
//! Trailing-month windows and named reporting periods, expressed as
//! [`MonthKey`] ranges. The clock-free functions take an anchor month;
//! [`months_back`] and [`get_date_range`] anchor on the current UTC month.

use std::str::FromStr;

use comtrack_core::{ComtrackError, MonthKey};
use serde::{Deserialize, Serialize};

/// A named reporting window ending at the anchor month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Period {
    /// The anchor month only.
    ThisMonth,
    /// The anchor month and the two before it.
    Last3Months,
    /// The anchor month and the five before it.
    #[default]
    Last6Months,
    /// January of the anchor year through the anchor month.
    Ytd,
}

impl Period {
    /// All periods.
    pub fn all() -> &'static [Period] {
        &[Self::ThisMonth, Self::Last3Months, Self::Last6Months, Self::Ytd]
    }

    /// Wire name of the period.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThisMonth => "thisMonth",
            Self::Last3Months => "last3Months",
            Self::Last6Months => "last6Months",
            Self::Ytd => "ytd",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ComtrackError;

    /// Parse a wire name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ComtrackError::UnknownPeriod(s.to_string()))
    }
}

/// An inclusive month range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First month of the range.
    pub from: MonthKey,
    /// Last month of the range.
    pub to: MonthKey,
}

impl DateRange {
    /// Whether `month` lies within the range, bounds included.
    pub fn contains(&self, month: MonthKey) -> bool {
        self.from <= month && month <= self.to
    }
}

/// The `n` months ending at `anchor`, oldest first.
///
/// Shorter than `n` only if the window would reach before `0000-01`.
pub fn months_back_from(anchor: MonthKey, n: usize) -> Vec<MonthKey> {
    // No window holds more months than lie between 0000-01 and the anchor.
    let available = usize::try_from(anchor.year())
        .map_or(0, |year| year * 12 + anchor.month() as usize);
    let mut months = Vec::with_capacity(n.min(available));
    let mut cursor = Some(anchor);
    while months.len() < n {
        match cursor {
            Some(month) => {
                months.push(month);
                cursor = month.prev();
            }
            None => break,
        }
    }
    months.reverse();
    months
}

/// The `n` months ending at the current month, oldest first.
pub fn months_back(n: usize) -> Vec<MonthKey> {
    months_back_from(MonthKey::current(), n)
}

/// Every month from `range.from` through `range.to`, in order. Empty when
/// the range is inverted.
pub fn months_in_range(range: DateRange) -> Vec<MonthKey> {
    let mut months = Vec::new();
    let mut cursor = Some(range.from);
    while let Some(month) = cursor {
        if month > range.to {
            break;
        }
        months.push(month);
        cursor = month.next();
    }
    months
}

/// Resolve `period` to a concrete range ending at `anchor`.
pub fn date_range_at(period: Period, anchor: MonthKey) -> DateRange {
    let from = match period {
        Period::ThisMonth => anchor,
        Period::Last3Months => window_start(anchor, 3),
        Period::Last6Months => window_start(anchor, 6),
        Period::Ytd => anchor.start_of_year(),
    };
    DateRange { from, to: anchor }
}

/// Resolve `period` to a concrete range ending at the current month.
pub fn get_date_range(period: Period) -> DateRange {
    date_range_at(period, MonthKey::current())
}

fn window_start(anchor: MonthKey, n: usize) -> MonthKey {
    months_back_from(anchor, n).first().copied().unwrap_or(anchor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn keys(v: &[MonthKey]) -> Vec<String> {
        v.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn six_months_back_from_september() {
        assert_eq!(
            keys(&months_back_from(key("2025-09"), 6)),
            vec!["2025-04", "2025-05", "2025-06", "2025-07", "2025-08", "2025-09"]
        );
    }

    #[test]
    fn months_back_crosses_january() {
        assert_eq!(
            keys(&months_back_from(key("2025-02"), 4)),
            vec!["2024-11", "2024-12", "2025-01", "2025-02"]
        );
    }

    #[test]
    fn months_back_zero_is_empty() {
        assert!(months_back_from(key("2025-02"), 0).is_empty());
    }

    #[test]
    fn months_back_stops_at_calendar_start() {
        assert_eq!(months_back_from(key("0000-02"), 5).len(), 2);
    }

    #[test]
    fn months_back_huge_count_is_bounded_by_calendar() {
        let months = months_back_from(key("2025-09"), usize::MAX);
        assert_eq!(months.len(), 2025 * 12 + 9);
        assert_eq!(months.first().copied(), Some(key("0000-01")));
        assert_eq!(months.last().copied(), Some(key("2025-09")));
    }

    #[test]
    fn months_back_ends_at_current_month() {
        let months = months_back(3);
        assert_eq!(months.len(), 3);
        assert_eq!(months.last().copied(), Some(MonthKey::current()));
    }

    #[test]
    fn named_periods() {
        let anchor = key("2025-09");
        assert_eq!(
            date_range_at(Period::ThisMonth, anchor),
            DateRange { from: anchor, to: anchor }
        );
        assert_eq!(date_range_at(Period::Last3Months, anchor).from, key("2025-07"));
        assert_eq!(date_range_at(Period::Last6Months, anchor).from, key("2025-04"));
        assert_eq!(date_range_at(Period::Ytd, anchor).from, key("2025-01"));
        assert_eq!(date_range_at(Period::Last3Months, key("2025-01")).from, key("2024-11"));
    }

    #[test]
    fn get_date_range_ends_now() {
        for period in Period::all() {
            assert_eq!(get_date_range(*period).to, MonthKey::current());
        }
    }

    #[test]
    fn period_names_roundtrip() {
        for period in Period::all() {
            assert_eq!(period.as_str().parse::<Period>().unwrap(), *period);
            let json = serde_json::to_string(period).unwrap();
            assert_eq!(json, format!("\"{}\"", period.as_str()));
        }
        assert_eq!("YTD".parse::<Period>().unwrap(), Period::Ytd);
        assert!("lastYear".parse::<Period>().is_err());
    }

    #[test]
    fn months_in_range_is_inclusive() {
        let range = DateRange { from: key("2024-11"), to: key("2025-02") };
        assert_eq!(keys(&months_in_range(range)), vec!["2024-11", "2024-12", "2025-01", "2025-02"]);
        assert!(range.contains(key("2025-02")));
        assert!(!range.contains(key("2025-03")));
        let inverted = DateRange { from: key("2025-02"), to: key("2024-11") };
        assert!(months_in_range(inverted).is_empty());
    }
}
