//! # Regulatory Constants
//!
//! Fixed values from the fuel-intensity compliance scheme. These are
//! scheme-level inputs, not tunables: changing them changes what the
//! regulation means.

/// Energy conversion factor: megajoules per tonne of fuel.
pub const MJ_PER_TONNE: f64 = 41_000.0;

/// Target greenhouse-gas intensity for the 2025 compliance period,
/// in gCO₂e/MJ (2% below the 2024 baseline).
pub const TARGET_INTENSITY_2025: f64 = 89.3368;

/// Baseline greenhouse-gas intensity of the 2024 reference period,
/// in gCO₂e/MJ.
pub const BASELINE_INTENSITY_2024: f64 = 91.0;
