//! # Monthly Time-Series Rollup
//!
//! Rolls payments up into one [`TimeSeriesData`] record per calendar month.
//!
//! ## Algorithm
//!
//! 1. **Filter.** Payments without a usable date are dropped. The bucket key
//!    is the payment's own date truncated to `YYYY-MM`. `from` and `to` are
//!    inclusive month bounds. A non-empty advisor filter keeps only payments
//!    whose resolved advisor identity is in the filter.
//! 2. **Group** by bucket key.
//! 3. **Sum** APE, receipts, and commission per bucket. Commission comes from
//!    the per-record strategy: the attached amount, or 3% of APE.
//! 4. **Emit** one record per populated bucket, ascending by month.
//!
//! A bad record is only ever excluded; it cannot fail the rollup.
//!
//! [`fill_month_gaps`] then densifies a sparse result over a caller-chosen
//! list of months for charting.

use std::collections::{BTreeMap, HashMap, HashSet};

use comtrack_core::{MonthKey, Payment};
use serde::{Deserialize, Serialize};

use crate::calendar::DateRange;
use crate::strategy::select_strategy;

/// Filters applied before rolling up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupOptions {
    /// First month included.
    #[serde(default)]
    pub from: Option<MonthKey>,
    /// Last month included.
    #[serde(default)]
    pub to: Option<MonthKey>,
    /// Advisor identities to keep. Empty keeps everyone.
    #[serde(default)]
    pub advisor_filter: Vec<String>,
}

impl RollupOptions {
    /// No bounds, no advisor filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the first month included.
    pub fn from_month(mut self, from: MonthKey) -> Self {
        self.from = Some(from);
        self
    }

    /// Builder: set the last month included.
    pub fn to_month(mut self, to: MonthKey) -> Self {
        self.to = Some(to);
        self
    }

    /// Builder: bound by an inclusive range.
    pub fn within(self, range: DateRange) -> Self {
        self.from_month(range.from).to_month(range.to)
    }

    /// Builder: add an advisor identity to the filter.
    pub fn advisor(mut self, identity: impl Into<String>) -> Self {
        self.advisor_filter.push(identity.into());
        self
    }

    fn in_window(&self, month: MonthKey) -> bool {
        self.from.map_or(true, |from| month >= from) && self.to.map_or(true, |to| month <= to)
    }
}

/// Aggregates for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesData {
    /// The calendar month aggregated.
    pub month: MonthKey,
    /// Exact or estimated commission summed over the month.
    pub total_commission: f64,
    /// Number of payments in the month.
    pub count: usize,
    /// APE summed over the month.
    pub total_ape: f64,
    /// Receipts summed over the month.
    pub total_receipts: f64,
}

impl TimeSeriesData {
    /// An all-zero record for `month`.
    pub fn empty(month: MonthKey) -> Self {
        Self {
            month,
            total_commission: 0.0,
            count: 0,
            total_ape: 0.0,
            total_receipts: 0.0,
        }
    }

    fn add(&mut self, payment: &Payment) {
        self.total_commission += select_strategy(payment).commission(payment);
        self.total_ape += payment.ape;
        self.total_receipts += payment.receipts;
        self.count += 1;
    }
}

/// Group the payments that pass `options` by month bucket.
///
/// Within a bucket, payments keep their input order.
pub fn group_by_month<'a>(
    payments: &'a [Payment],
    options: &RollupOptions,
) -> BTreeMap<MonthKey, Vec<&'a Payment>> {
    let advisors: HashSet<&str> = options.advisor_filter.iter().map(String::as_str).collect();
    let mut buckets: BTreeMap<MonthKey, Vec<&'a Payment>> = BTreeMap::new();
    let mut undated = 0usize;

    for payment in payments {
        let Some(month) = payment.month() else {
            undated += 1;
            continue;
        };
        if !options.in_window(month) {
            continue;
        }
        if !advisors.is_empty() {
            let matched = payment
                .advisor_identity()
                .is_some_and(|identity| advisors.contains(identity.as_str()));
            if !matched {
                continue;
            }
        }
        buckets.entry(month).or_default().push(payment);
    }

    if undated > 0 {
        tracing::debug!(undated, "payments without a usable date excluded from rollup");
    }
    buckets
}

/// Roll `payments` up into monthly aggregates, ascending by month.
pub fn rollup_monthly(payments: &[Payment], options: &RollupOptions) -> Vec<TimeSeriesData> {
    group_by_month(payments, options)
        .into_iter()
        .map(|(month, bucket)| {
            let mut record = TimeSeriesData::empty(month);
            for payment in bucket {
                record.add(payment);
            }
            record
        })
        .collect()
}

/// Produce one record per entry of `months`, in that order, taking it from
/// `data` where present and substituting an all-zero record otherwise.
///
/// Months in `data` that are not listed are omitted. If `data` holds the
/// same month twice, the first occurrence is used.
pub fn fill_month_gaps(data: &[TimeSeriesData], months: &[MonthKey]) -> Vec<TimeSeriesData> {
    let mut by_month: HashMap<MonthKey, &TimeSeriesData> = HashMap::with_capacity(data.len());
    for record in data {
        by_month.entry(record.month).or_insert(record);
    }
    months
        .iter()
        .map(|month| {
            by_month
                .get(month)
                .map(|record| **record)
                .unwrap_or_else(|| TimeSeriesData::empty(*month))
        })
        .collect()
}
