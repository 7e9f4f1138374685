//! # Rollup Commission Strategies
//!
//! At rollup time a payment's policy is often no longer at hand. Each
//! payment is therefore valued by one of two strategies, chosen per record:
//!
//! - [`ExactCommissionStrategy`] when the payment carries the commission
//!   attached when it was priced.
//! - [`EstimationStrategy`] otherwise: a flat 3% of APE.
//!
//! The estimate is a fixed business rule, not a tunable. It is never used
//! when an attached amount exists, even an attached zero.

use comtrack_core::Payment;

/// Fraction of APE used to estimate commission when none is attached.
pub const ESTIMATED_COMMISSION_RATE: f64 = 0.03;

/// A way of valuing a payment's commission during rollup.
pub trait CommissionStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Whether this strategy can value `payment`.
    fn applies_to(&self, payment: &Payment) -> bool;

    /// The commission amount for `payment`.
    fn commission(&self, payment: &Payment) -> f64;
}

/// Uses the commission amount attached to the payment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactCommissionStrategy;

impl CommissionStrategy for ExactCommissionStrategy {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn applies_to(&self, payment: &Payment) -> bool {
        payment.commission.is_some()
    }

    fn commission(&self, payment: &Payment) -> f64 {
        payment.commission.unwrap_or(0.0)
    }
}

/// Estimates commission as [`ESTIMATED_COMMISSION_RATE`] of APE.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimationStrategy;

impl CommissionStrategy for EstimationStrategy {
    fn name(&self) -> &'static str {
        "estimated"
    }

    fn applies_to(&self, _payment: &Payment) -> bool {
        true
    }

    fn commission(&self, payment: &Payment) -> f64 {
        payment.ape * ESTIMATED_COMMISSION_RATE
    }
}

static EXACT: ExactCommissionStrategy = ExactCommissionStrategy;
static ESTIMATION: EstimationStrategy = EstimationStrategy;

/// Pick the strategy for `payment`: exact when an amount is attached,
/// estimation otherwise.
pub fn select_strategy(payment: &Payment) -> &'static dyn CommissionStrategy {
    if EXACT.applies_to(payment) {
        &EXACT
    } else {
        &ESTIMATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_uses_attached_amount() {
        let p = Payment::new("p1", "LIFE", 10_000.0, 0.0).with_commission(1_440.0);
        let strategy = select_strategy(&p);
        assert_eq!(strategy.name(), "exact");
        assert_eq!(strategy.commission(&p), 1_440.0);
    }

    #[test]
    fn attached_zero_is_still_exact() {
        let p = Payment::new("p1", "LIFE", 10_000.0, 0.0).with_commission(0.0);
        assert_eq!(select_strategy(&p).commission(&p), 0.0);
    }

    #[test]
    fn missing_amount_is_estimated_at_three_percent() {
        let p = Payment::new("p1", "LIFE", 10_000.0, 0.0);
        let strategy = select_strategy(&p);
        assert_eq!(strategy.name(), "estimated");
        assert!((strategy.commission(&p) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn strategies_are_independent() {
        let p = Payment::new("p1", "LIFE", 2_000.0, 0.0).with_commission(5.0);
        assert!((EstimationStrategy.commission(&p) - 60.0).abs() < 1e-9);
        assert_eq!(ExactCommissionStrategy.commission(&p), 5.0);
        assert!(!ExactCommissionStrategy.applies_to(&Payment::new("p2", "LIFE", 1.0, 1.0)));
    }
}
