//! # Commission Calculator
//!
//! Maps a payment priced under a product policy to a [`CommissionResult`]
//! in three steps, each public so callers can preview or test them alone:
//!
//! 1. [`compute_base`] picks the base. With
//!    `threshold = ape * threshold_multiplier`, receipts at or below the
//!    threshold price on APE, receipts above it price on receipts. The
//!    comparison is `<=`, so equality (including `ape == receipts == 0`)
//!    always resolves to APE.
//! 2. [`apply_margin`] deducts the house margin: `base * (1 - margin/100)`.
//! 3. [`split_pool`] multiplies the pool by each role's fraction.
//!
//! Nothing is rounded and nothing is validated. Negative amounts and
//! margins are computed as given. Rounding for display is the caller's.

use comtrack_core::{Payment, Policy, Split};
use serde::{Deserialize, Serialize};

/// Which payment amount the commission rate was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommissionMethod {
    /// Annualized premium equivalent.
    #[serde(rename = "APE")]
    Ape,
    /// Premium actually received.
    Receipts,
}

impl CommissionMethod {
    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ape => "APE",
            Self::Receipts => "Receipts",
        }
    }
}

impl std::fmt::Display for CommissionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The priced commission for one payment.
///
/// Only ever derived from a (payment, policy) pair; it has no identity of
/// its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionResult {
    /// Base selected by the threshold rule.
    pub method_used: CommissionMethod,
    /// Selected amount multiplied by the product rate.
    pub commission_base: f64,
    /// Base after margin; the amount distributed.
    pub pool_amount: f64,
    /// Monetary share per role.
    pub split: Split,
}

impl CommissionResult {
    /// Sum of the four monetary shares.
    pub fn total_shares(&self) -> f64 {
        self.split.total()
    }
}

/// Select the commission base for `payment` under `policy`.
///
/// Returns the method used and `amount * product_rate_pct / 100`.
pub fn compute_base(payment: &Payment, policy: &Policy) -> (CommissionMethod, f64) {
    let threshold = payment.ape * policy.threshold_multiplier;
    let rate = policy.product_rate_pct / 100.0;
    if payment.receipts <= threshold {
        (CommissionMethod::Ape, payment.ape * rate)
    } else {
        (CommissionMethod::Receipts, payment.receipts * rate)
    }
}

/// Deduct a percentage margin from `base`.
pub fn apply_margin(base: f64, margin_pct: f64) -> f64 {
    base * (1.0 - margin_pct / 100.0)
}

/// Distribute `pool` across the four roles by `split` fractions.
pub fn split_pool(pool: f64, split: &Split) -> Split {
    split.map(|fraction| pool * fraction)
}

/// Price `payment` under `policy`.
pub fn compute_commission(payment: &Payment, policy: &Policy) -> CommissionResult {
    let (method_used, commission_base) = compute_base(payment, policy);
    let pool_amount = apply_margin(commission_base, policy.margin_pct);
    CommissionResult {
        method_used,
        commission_base,
        pool_amount,
        split: split_pool(pool_amount, &policy.split),
    }
}
