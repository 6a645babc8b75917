//! # Baseline Comparison
//!
//! Expresses a route's greenhouse-gas intensity as a percent difference
//! from the designated baseline route, and flags compliance against the
//! target threshold:
//!
//! ```text
//! percent_difference = ((candidate / baseline) - 1) × 100
//! compliant          = candidate ≤ target
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fueleu_core::{Route, RouteId};

/// Errors from baseline comparison.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComparisonError {
    /// The baseline intensity is zero — the percent difference would divide
    /// by zero. IEEE division would silently produce infinity, so this is
    /// rejected explicitly.
    #[error("invalid baseline: baseline intensity must be non-zero")]
    InvalidBaseline,
}

/// Result of comparing one intensity against the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Percent difference from the baseline. Negative = cleaner than
    /// baseline.
    pub percent_difference: f64,
    /// Whether the candidate meets the target threshold.
    pub compliant: bool,
}

/// A comparison row for one route in the catalog, as served to callers
/// ranking routes against the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// The compared route.
    pub route_id: RouteId,
    /// Vessel type, carried through from the catalog record.
    pub vessel_type: String,
    /// Fuel type, carried through from the catalog record.
    pub fuel_type: String,
    /// Reporting year.
    pub year: i32,
    /// The route's measured intensity, in gCO₂e/MJ.
    pub ghg_intensity: f64,
    /// Percent difference from the baseline intensity.
    pub percent_difference: f64,
    /// Whether the route meets the target threshold.
    pub compliant: bool,
}

/// Compare a candidate intensity against a baseline intensity and a target
/// threshold. Pure and deterministic.
///
/// # Errors
///
/// Returns [`ComparisonError::InvalidBaseline`] if `baseline_intensity`
/// is zero.
pub fn compare(
    baseline_intensity: f64,
    candidate_intensity: f64,
    target: f64,
) -> Result<Comparison, ComparisonError> {
    if baseline_intensity == 0.0 {
        return Err(ComparisonError::InvalidBaseline);
    }

    Ok(Comparison {
        percent_difference: ((candidate_intensity / baseline_intensity) - 1.0) * 100.0,
        compliant: candidate_intensity <= target,
    })
}

/// Compare every route in `others` against the baseline route, skipping the
/// baseline itself if it appears in the slice.
///
/// # Errors
///
/// Returns [`ComparisonError::InvalidBaseline`] if the baseline route's
/// intensity is zero.
pub fn compare_routes(
    baseline: &Route,
    others: &[Route],
    target: f64,
) -> Result<Vec<ComparisonRow>, ComparisonError> {
    others
        .iter()
        .filter(|route| route.route_id != baseline.route_id)
        .map(|route| {
            let cmp = compare(baseline.ghg_intensity, route.ghg_intensity, target)?;
            Ok(ComparisonRow {
                route_id: route.route_id.clone(),
                vessel_type: route.vessel_type.clone(),
                fuel_type: route.fuel_type.clone(),
                year: route.year,
                ghg_intensity: route.ghg_intensity,
                percent_difference: cmp.percent_difference,
                compliant: cmp.compliant,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fueleu_core::TARGET_INTENSITY_2025;

    #[test]
    fn cleaner_candidate_is_negative_and_compliant() {
        let cmp = compare(91.0, 88.0, TARGET_INTENSITY_2025).unwrap();
        assert!((cmp.percent_difference - -3.297).abs() < 1e-3);
        assert!(cmp.compliant);
    }

    #[test]
    fn dirtier_candidate_is_positive_and_noncompliant() {
        let cmp = compare(91.0, 93.5, TARGET_INTENSITY_2025).unwrap();
        assert!((cmp.percent_difference - 2.747).abs() < 1e-3);
        assert!(!cmp.compliant);
    }

    #[test]
    fn candidate_exactly_at_target_is_compliant() {
        let cmp = compare(91.0, TARGET_INTENSITY_2025, TARGET_INTENSITY_2025).unwrap();
        assert!(cmp.compliant);
    }

    #[test]
    fn zero_baseline_rejected() {
        assert_eq!(
            compare(0.0, 88.0, TARGET_INTENSITY_2025),
            Err(ComparisonError::InvalidBaseline)
        );
        // Negative zero is still zero.
        assert_eq!(
            compare(-0.0, 88.0, TARGET_INTENSITY_2025),
            Err(ComparisonError::InvalidBaseline)
        );
    }

    #[test]
    fn identical_intensities_differ_by_zero_percent() {
        let cmp = compare(91.0, 91.0, TARGET_INTENSITY_2025).unwrap();
        assert_eq!(cmp.percent_difference, 0.0);
    }

    fn route(id: &str, intensity: f64, baseline: bool) -> Route {
        Route {
            route_id: RouteId::new(id).unwrap(),
            vessel_type: "Container".to_string(),
            fuel_type: "HFO".to_string(),
            year: 2024,
            ghg_intensity: intensity,
            fuel_consumption_t: 5000.0,
            distance_km: 12_000.0,
            total_emissions_t: 18_500.0,
            is_baseline: baseline,
        }
    }

    #[test]
    fn compare_routes_skips_baseline_itself() {
        let baseline = route("R001", 91.0, true);
        let all = vec![
            route("R001", 91.0, true),
            route("R002", 88.0, false),
            route("R003", 93.5, false),
        ];

        let rows = compare_routes(&baseline, &all, TARGET_INTENSITY_2025).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].route_id.as_str(), "R002");
        assert!(rows[0].compliant);
        assert_eq!(rows[1].route_id.as_str(), "R003");
        assert!(!rows[1].compliant);
    }

    #[test]
    fn compare_routes_with_zero_baseline_intensity_fails() {
        let baseline = route("R001", 0.0, true);
        let all = vec![route("R002", 88.0, false)];
        assert_eq!(
            compare_routes(&baseline, &all, TARGET_INTENSITY_2025),
            Err(ComparisonError::InvalidBaseline)
        );
    }
}
