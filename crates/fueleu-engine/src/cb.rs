//! # Carbon Balance Computation
//!
//! Converts fuel consumption plus target/actual greenhouse-gas intensities
//! into energy (MJ) and a signed carbon balance (gCO₂e):
//!
//! ```text
//! energy_mj = fuel_consumption_t × 41000
//! cb_gco2eq = (target − actual) × energy_mj
//! ```
//!
//! Positive CB is surplus (ship under target); negative CB is deficit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fueleu_core::MJ_PER_TONNE;

/// Errors from carbon-balance computation. All are input-validation
/// rejections — the computation itself cannot fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CbError {
    /// Target intensity is not a number.
    #[error("invalid input: target intensity must be a valid number (received NaN)")]
    InvalidTarget,

    /// Actual intensity is not a number.
    #[error("invalid input: actual intensity must be a valid number (received NaN)")]
    InvalidActual,

    /// Fuel consumption is negative.
    #[error("invalid input: fuel consumption must be non-negative (received {0})")]
    NegativeFuelConsumption(f64),
}

/// Result of a carbon-balance computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CbOutcome {
    /// Signed carbon balance, in gCO₂e. Positive = surplus.
    pub cb_gco2eq: f64,
    /// Energy derived from fuel consumption, in MJ.
    pub energy_mj: f64,
}

/// Compute energy and carbon balance for one reporting period.
///
/// `target` and `actual` are intensities in gCO₂e/MJ; `fuel_consumption_t`
/// is in tonnes. Deterministic and side-effect free: identical inputs yield
/// bit-identical outputs.
///
/// # Errors
///
/// - [`CbError::InvalidTarget`] / [`CbError::InvalidActual`] when an
///   intensity is NaN.
/// - [`CbError::NegativeFuelConsumption`] when `fuel_consumption_t < 0`.
pub fn compute_cb(target: f64, actual: f64, fuel_consumption_t: f64) -> Result<CbOutcome, CbError> {
    if target.is_nan() {
        return Err(CbError::InvalidTarget);
    }
    if actual.is_nan() {
        return Err(CbError::InvalidActual);
    }
    if fuel_consumption_t < 0.0 {
        return Err(CbError::NegativeFuelConsumption(fuel_consumption_t));
    }

    let energy_mj = fuel_consumption_t * MJ_PER_TONNE;
    let cb_gco2eq = (target - actual) * energy_mj;

    Ok(CbOutcome {
        cb_gco2eq,
        energy_mj,
    })
}
