//! # Commission Subcommand
//!
//! Prices payments against the configured policy book and prints one
//! result per payment as JSON. Payments whose product has no policy are
//! reported with a `null` commission and make the command exit with 1.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use comtrack_core::{PaymentId, ProductId};
use comtrack_engine::{preview_commission, CommissionResult};
use comtrack_report::AuditEntry;

use crate::config::CliConfig;

/// Arguments for the `comtrack commission` subcommand.
#[derive(Args, Debug)]
pub struct CommissionArgs {
    /// Payment JSON file holding one record or an array of records.
    #[arg(value_name = "PAYMENT_JSON")]
    pub payment: PathBuf,

    /// Record an audit entry for this actor with every priced payment.
    #[arg(long)]
    pub actor: Option<String>,
}

/// One line of `commission` output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedPayment {
    pub payment_id: PaymentId,
    pub product_id: ProductId,
    pub commission: Option<CommissionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditEntry>,
}

/// Execute the commission subcommand.
///
/// Returns exit code: 0 when every payment was priced, 1 when any product
/// had no policy.
pub fn run_commission(
    args: &CommissionArgs,
    config: &CliConfig,
    out: &mut dyn Write,
) -> Result<u8> {
    let payments = crate::load_payments(&args.payment)?;
    let book = config.policy_book();

    let mut missing = 0usize;
    let mut priced = Vec::with_capacity(payments.len());
    for payment in &payments {
        let commission = preview_commission(payment, &book);
        let audit = match (&commission, &args.actor) {
            (Some(result), Some(actor)) => {
                Some(AuditEntry::commission_computed(actor.as_str(), payment, result))
            }
            _ => None,
        };
        if commission.is_none() {
            missing += 1;
            tracing::warn!(payment_id = %payment.id, product_id = %payment.product_id, "no policy for product");
        }
        priced.push(PricedPayment {
            payment_id: payment.id.clone(),
            product_id: payment.product_id.clone(),
            commission,
            audit,
        });
    }

    let body = serde_json::to_string_pretty(&priced).context("failed to serialize results")?;
    writeln!(out, "{body}").context("failed to write results")?;

    tracing::info!(
        priced = priced.len() - missing,
        missing,
        audited = priced.iter().filter(|p| p.audit.is_some()).count(),
        "commission run complete"
    );
    Ok(if missing == 0 { 0 } else { 1 })
}
