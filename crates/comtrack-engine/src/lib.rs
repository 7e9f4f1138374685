//! # comtrack-engine — Commission Calculation and Monthly Rollup
//!
//! The arithmetic core of the commission tracker.
//!
//! ## Pipeline
//!
//! ```text
//! Policy + Payment
//!   → compute_base()    → (method, base)
//!   → apply_margin()    → pool
//!   → split_pool()      → four shares
//!   = compute_commission() → CommissionResult
//!
//! [Payment] + RollupOptions
//!   → rollup_monthly()  → sparse monthly series, ascending
//!   → fill_month_gaps() → dense series over months_back(n) / get_date_range()
//! ```
//!
//! ## Determinism
//!
//! Every function here is pure. No clock is read except by the explicitly
//! clock-based entry points [`months_back`] and [`get_date_range`], each of
//! which has a clock-free twin taking an anchor month. Identical inputs
//! produce bit-identical floating-point outputs because the order of
//! operations is fixed.
//!
//! No function here fails or panics on numeric input, including negative,
//! zero, or non-finite values. Validation belongs to the callers.

pub mod calendar;
pub mod commission;
pub mod pricing;
pub mod rollup;
pub mod strategy;

// Re-export primary types.
pub use calendar::{
    date_range_at, get_date_range, months_back, months_back_from, months_in_range, DateRange,
    Period,
};
pub use commission::{
    apply_margin, compute_base, compute_commission, split_pool, CommissionMethod,
    CommissionResult,
};
pub use pricing::{preview_commission, price_payments};
pub use rollup::{fill_month_gaps, rollup_monthly, RollupOptions, TimeSeriesData};
pub use strategy::{
    select_strategy, CommissionStrategy, EstimationStrategy, ExactCommissionStrategy,
    ESTIMATED_COMMISSION_RATE,
};
