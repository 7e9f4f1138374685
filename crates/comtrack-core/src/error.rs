//! # Error Types
//!
//! The calculator and the rollup engine are total over their inputs and
//! never return errors. What can fail is parsing values that arrive as
//! text: month keys, period names, payment statuses.

use thiserror::Error;

/// Top-level error type for the commission engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComtrackError {
    /// A month key was not of the form `YYYY-MM`.
    #[error("invalid month key {0:?}: expected YYYY-MM")]
    InvalidMonth(String),

    /// A reporting period name was not recognized.
    #[error("unknown reporting period {0:?}")]
    UnknownPeriod(String),

    /// A payment status was not one of Paid, Pending, Processing.
    #[error("unknown payment status {0:?}")]
    UnknownStatus(String),
}
