//! # Rollup Subcommand
//!
//! Rolls a payment export up into a monthly series.
//!
//! Payments are first priced against the policy book so that products with
//! a known policy are valued exactly; the rest fall back to the estimate.
//! The window is either explicit (`--from`/`--to`) or a named period
//! resolved at the current month. `--fill` emits every month of the window,
//! zero-filled. CSV output is only produced for roles allowed to export.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use comtrack_core::MonthKey;
use comtrack_engine::{
    date_range_at, fill_month_gaps, months_in_range, price_payments, rollup_monthly, DateRange,
    Period, RollupOptions, TimeSeriesData,
};
use comtrack_report::export_csv_as;

use crate::config::CliConfig;

/// Output encoding for the series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

/// Arguments for the `comtrack rollup` subcommand.
#[derive(Args, Debug)]
pub struct RollupArgs {
    /// Payments JSON file holding an array of records.
    #[arg(value_name = "PAYMENTS_JSON")]
    pub payments: PathBuf,

    /// Named period (thisMonth, last3Months, last6Months, ytd). Ignored
    /// when --from or --to is given.
    #[arg(long)]
    pub period: Option<Period>,

    /// First month included (YYYY-MM).
    #[arg(long)]
    pub from: Option<MonthKey>,

    /// Last month included (YYYY-MM).
    #[arg(long)]
    pub to: Option<MonthKey>,

    /// Keep only this advisor identity. Repeatable.
    #[arg(long = "advisor", value_name = "IDENTITY")]
    pub advisors: Vec<String>,

    /// Emit every month of the window, zero-filled.
    #[arg(long)]
    pub fill: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Role used for CSV export permission. Overrides the configured role.
    #[arg(long)]
    pub role: Option<String>,
}

impl RollupArgs {
    /// Rollup options for these arguments with `current` as the anchor month.
    pub fn options(&self, config: &CliConfig, current: MonthKey) -> RollupOptions {
        let mut options = if self.from.is_some() || self.to.is_some() {
            RollupOptions {
                from: self.from,
                to: self.to,
                ..RollupOptions::default()
            }
        } else {
            let period = self.period.unwrap_or(config.default_period);
            RollupOptions::new().within(date_range_at(period, current))
        };
        options.advisor_filter = self.advisors.clone();
        options
    }
}

/// Execute the rollup subcommand.
pub fn run_rollup(
    args: &RollupArgs,
    config: &CliConfig,
    current: MonthKey,
    out: &mut dyn Write,
) -> Result<u8> {
    let payments = crate::load_payments(&args.payments)?;
    let payments = price_payments(payments, &config.policy_book());
    let options = args.options(config, current);

    let mut series = rollup_monthly(&payments, &options);
    if args.fill {
        series = fill_window(&series, &options);
    }
    tracing::info!(
        payments = payments.len(),
        months = series.len(),
        from = ?options.from,
        to = ?options.to,
        "rollup complete"
    );

    match args.format {
        OutputFormat::Json => {
            let body =
                serde_json::to_string_pretty(&series).context("failed to serialize series")?;
            writeln!(out, "{body}").context("failed to write series")?;
        }
        OutputFormat::Csv => {
            let Some(role) = args.role.as_deref().or(config.role.as_deref()) else {
                bail!("csv export requires a role: pass --role or set COMTRACK_ROLE");
            };
            let body = export_csv_as(role, &series)?;
            if !body.is_empty() {
                writeln!(out, "{body}").context("failed to write csv")?;
            }
        }
    }
    Ok(0)
}

/// Densify `series` over the window. An open bound is taken from the data.
fn fill_window(series: &[TimeSeriesData], options: &RollupOptions) -> Vec<TimeSeriesData> {
    let from = options.from.or_else(|| series.first().map(|r| r.month));
    let to = options.to.or_else(|| series.last().map(|r| r.month));
    match (from, to) {
        (Some(from), Some(to)) => fill_month_gaps(series, &months_in_range(DateRange { from, to })),
        _ => series.to_vec(),
    }
}
