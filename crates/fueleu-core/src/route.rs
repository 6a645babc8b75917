//! # Route Catalog Record
//!
//! The route record pairs a voyage profile (vessel, fuel, distance) with
//! the measured emissions data the compliance engine consumes: greenhouse-gas
//! intensity and fuel consumption. At most one route in the catalog carries
//! the baseline flag at any time; the service layer enforces that
//! exclusivity.

use serde::{Deserialize, Serialize};

use crate::identity::RouteId;

/// A shipping route with fuel consumption and emissions data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Catalog identifier.
    pub route_id: RouteId,
    /// Vessel type (e.g., "Container", "Tanker").
    pub vessel_type: String,
    /// Fuel type (e.g., "HFO", "LNG").
    pub fuel_type: String,
    /// Reporting year.
    pub year: i32,
    /// Measured greenhouse-gas intensity, in gCO₂e/MJ.
    pub ghg_intensity: f64,
    /// Fuel consumed over the reporting period, in tonnes.
    pub fuel_consumption_t: f64,
    /// Route distance, in kilometres.
    pub distance_km: f64,
    /// Total emissions over the reporting period, in tonnes CO₂e.
    pub total_emissions_t: f64,
    /// Whether this route is the designated comparison baseline.
    #[serde(default)]
    pub is_baseline: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Route {
        Route {
            route_id: RouteId::new("R001").unwrap(),
            vessel_type: "Container".to_string(),
            fuel_type: "HFO".to_string(),
            year: 2024,
            ghg_intensity: 91.0,
            fuel_consumption_t: 5000.0,
            distance_km: 12_000.0,
            total_emissions_t: 18_500.0,
            is_baseline: false,
        }
    }

    #[test]
    fn serde_round_trip() {
        let route = sample();
        let json = serde_json::to_string(&route).unwrap();
        let back: Route = serde_json::from_str(&json).unwrap();
        assert_eq!(back, route);
    }

    #[test]
    fn is_baseline_defaults_to_false() {
        let json = r#"{
            "route_id": "R002",
            "vessel_type": "Tanker",
            "fuel_type": "LNG",
            "year": 2024,
            "ghg_intensity": 88.0,
            "fuel_consumption_t": 4200.0,
            "distance_km": 9000.0,
            "total_emissions_t": 15000.0
        }"#;
        let route: Route = serde_json::from_str(json).unwrap();
        assert!(!route.is_baseline);
    }
}
