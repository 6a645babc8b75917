//! `fueleu cb` — offline carbon-balance computation.

use anyhow::Context;
use clap::Args;
use fueleu_core::TARGET_INTENSITY_2025;
use fueleu_engine::compute_cb;

/// Arguments for the `cb` subcommand.
#[derive(Args, Debug)]
pub struct CbArgs {
    /// Target greenhouse-gas intensity, gCO₂e/MJ.
    #[arg(long, default_value_t = TARGET_INTENSITY_2025)]
    pub target: f64,

    /// Actual (measured) greenhouse-gas intensity, gCO₂e/MJ.
    #[arg(long)]
    pub actual: f64,

    /// Fuel consumption, tonnes.
    #[arg(long = "fuel-t")]
    pub fuel_t: f64,
}

/// Run the `cb` subcommand.
pub fn run_cb(args: &CbArgs) -> anyhow::Result<u8> {
    let outcome = compute_cb(args.target, args.actual, args.fuel_t)
        .context("carbon-balance computation rejected")?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_cb_accepts_reference_scenario() {
        let args = CbArgs {
            target: 89.3368,
            actual: 91.0,
            fuel_t: 5000.0,
        };
        assert_eq!(run_cb(&args).unwrap(), 0);
    }

    #[test]
    fn run_cb_rejects_negative_fuel() {
        let args = CbArgs {
            target: 89.3368,
            actual: 91.0,
            fuel_t: -1.0,
        };
        assert!(run_cb(&args).is_err());
    }
}
