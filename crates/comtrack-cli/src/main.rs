//! # comtrack CLI entry point
//!
//! Parses command-line arguments, loads configuration, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use comtrack_cli::commission::{run_commission, CommissionArgs};
use comtrack_cli::config::CliConfig;
use comtrack_cli::months::{run_months, MonthsArgs};
use comtrack_cli::rollup::{run_rollup, RollupArgs};
use comtrack_core::MonthKey;

/// Commission tracker CLI.
///
/// Prices insurance payments against product policies and rolls them up
/// into monthly commission series.
#[derive(Parser, Debug)]
#[command(name = "comtrack", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Price payments against their product policies.
    Commission(CommissionArgs),

    /// Roll payments up into a monthly series.
    Rollup(RollupArgs),

    /// List the trailing reporting months.
    Months(MonthsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(2);
        }
    };
    tracing::debug!(
        policies = config.policies.len(),
        period = %config.default_period,
        "configuration loaded"
    );

    let current = MonthKey::current();
    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Commands::Commission(args) => run_commission(&args, &config, &mut stdout),
        Commands::Rollup(args) => run_rollup(&args, &config, current, &mut stdout),
        Commands::Months(args) => run_months(&args, current, &mut stdout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
