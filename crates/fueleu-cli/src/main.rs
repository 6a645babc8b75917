//! # fueleu CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Uses clap derive macros for argument parsing.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fueleu_cli::balance::{run_cb, CbArgs};
use fueleu_cli::compare::{run_compare, CompareArgs};
use fueleu_cli::pool::{run_pool, PoolArgs};

/// FuelEU compliance toolchain.
///
/// Offline access to the compliance engine: carbon-balance computation,
/// greedy pool allocation, and baseline comparison.
#[derive(Parser, Debug)]
#[command(name = "fueleu", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute carbon balance and energy for one reporting period.
    Cb(CbArgs),

    /// Run the greedy pool allocator over a members file.
    Pool(PoolArgs),

    /// Compare a candidate intensity against a baseline.
    Compare(CompareArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Cb(args) => run_cb(&args),
        Commands::Pool(args) => run_pool(&args),
        Commands::Compare(args) => run_compare(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
