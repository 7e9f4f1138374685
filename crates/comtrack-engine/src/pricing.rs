//! # Batch Pricing
//!
//! Attaches commission amounts to payments whose product policy is known,
//! so the rollup can value them exactly instead of estimating.

use comtrack_core::{Payment, PolicyBook};

use crate::commission::{compute_commission, CommissionResult};

/// Price a single payment against the book, if its product has a policy.
pub fn preview_commission(payment: &Payment, book: &PolicyBook) -> Option<CommissionResult> {
    book.get(&payment.product_id)
        .map(|policy| compute_commission(payment, policy))
}

/// Attach the pool amount to every payment that has a policy in `book`
/// and no commission yet. Already-priced payments keep their amount;
/// payments with unknown products are left for the rollup to estimate.
pub fn price_payments(payments: Vec<Payment>, book: &PolicyBook) -> Vec<Payment> {
    let mut unpriced = 0usize;
    let priced: Vec<Payment> = payments
        .into_iter()
        .map(|mut payment| {
            if payment.commission.is_none() {
                match preview_commission(&payment, book) {
                    Some(result) => payment.commission = Some(result.pool_amount),
                    None => unpriced += 1,
                }
            }
            payment
        })
        .collect();
    if unpriced > 0 {
        tracing::debug!(unpriced, "payments without a known policy left unpriced");
    }
    priced
}
