//! `fueleu compare` — compare a candidate intensity against a baseline.

use anyhow::Context;
use clap::Args;
use fueleu_core::TARGET_INTENSITY_2025;
use fueleu_engine::compare;

/// Arguments for the `compare` subcommand.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Baseline greenhouse-gas intensity, gCO₂e/MJ.
    #[arg(long)]
    pub baseline: f64,

    /// Candidate greenhouse-gas intensity, gCO₂e/MJ.
    #[arg(long)]
    pub candidate: f64,

    /// Target intensity threshold, gCO₂e/MJ.
    #[arg(long, default_value_t = TARGET_INTENSITY_2025)]
    pub target: f64,
}

/// Run the `compare` subcommand.
pub fn run_compare(args: &CompareArgs) -> anyhow::Result<u8> {
    let comparison =
        compare(args.baseline, args.candidate, args.target).context("comparison rejected")?;

    println!("{}", serde_json::to_string_pretty(&comparison)?);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_compare_accepts_reference_scenario() {
        let args = CompareArgs {
            baseline: 91.0,
            candidate: 88.0,
            target: TARGET_INTENSITY_2025,
        };
        assert_eq!(run_compare(&args).unwrap(), 0);
    }

    #[test]
    fn run_compare_rejects_zero_baseline() {
        let args = CompareArgs {
            baseline: 0.0,
            candidate: 88.0,
            target: TARGET_INTENSITY_2025,
        };
        assert!(run_compare(&args).is_err());
    }
}
