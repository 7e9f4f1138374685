//! # Months Subcommand
//!
//! Lists the trailing reporting months, oldest first, one per line.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use comtrack_core::MonthKey;
use comtrack_engine::months_back_from;

/// Arguments for the `comtrack months` subcommand.
#[derive(Args, Debug)]
pub struct MonthsArgs {
    /// Number of months to list.
    #[arg(value_name = "COUNT", default_value_t = 6)]
    pub count: usize,

    /// Last month of the window (YYYY-MM). Defaults to the current month.
    #[arg(long)]
    pub anchor: Option<MonthKey>,
}

/// Execute the months subcommand.
pub fn run_months(args: &MonthsArgs, current: MonthKey, out: &mut dyn Write) -> Result<u8> {
    let anchor = args.anchor.unwrap_or(current);
    for month in months_back_from(anchor, args.count) {
        writeln!(out, "{month}").context("failed to write months")?;
    }
    Ok(0)
}
