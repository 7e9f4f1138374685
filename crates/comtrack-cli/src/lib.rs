//! # comtrack-cli — Command-Line Interface for the Commission Engine
//!
//! Provides the `comtrack` binary.
//!
//! ## Subcommands
//!
//! - `comtrack commission`: Price one payment against its product policy.
//! - `comtrack rollup`: Monthly series for a payment export, as JSON or CSV.
//! - `comtrack months`: List the trailing reporting months.
//!
//! ```bash
//! comtrack --config comtrack.yaml commission payment.json --actor ana@example.com
//! comtrack --config comtrack.yaml rollup payments.json --period ytd --fill --format csv
//! comtrack months 6
//! ```
//!
//! Payment files hold loosely-typed records as exported by upstream
//! systems; they are normalized on load and never rejected for a bad date,
//! status, or number. An entry that is not a record at all is skipped with
//! a warning; the rest of the file still loads.

pub mod commission;
pub mod config;
pub mod months;
pub mod rollup;

use std::path::Path;

use anyhow::{Context, Result};
use comtrack_core::{Payment, RawPayment};

/// Load payments from a JSON file holding one record or an array of records.
pub fn load_payments(path: &Path) -> Result<Vec<Payment>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read payments file: {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse payments JSON: {}", path.display()))?;

    let records = match value {
        serde_json::Value::Array(records) => records,
        single => vec![single],
    };

    let mut skipped = 0usize;
    let raw: Vec<RawPayment> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<RawPayment>(record) {
            Ok(raw) => Some(raw),
            Err(e) => {
                skipped += 1;
                tracing::warn!(index, path = %path.display(), "skipping payment record: {e}");
                None
            }
        })
        .collect();
    if skipped > 0 {
        tracing::warn!(skipped, path = %path.display(), "payment records skipped");
    }

    let payments: Vec<Payment> = raw.into_iter().map(RawPayment::normalize).collect();
    tracing::debug!(count = payments.len(), path = %path.display(), "payments loaded");
    Ok(payments)
}
