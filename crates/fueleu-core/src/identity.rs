//! # Identity Newtypes
//!
//! Domain-primitive newtypes for identifiers in the FuelEU compliance
//! stack. Each identifier is a distinct type — you cannot pass a
//! [`RouteId`] where a [`ShipId`] is expected.
//!
//! Both identifiers validate at construction time: non-empty, at most 64
//! characters, no interior whitespace. In the route catalog a ship is
//! identified by the route it sails, so the two frequently carry the same
//! string value (`"R001"`) — the distinct types exist so the compiler keeps
//! ledger keys and catalog keys from being mixed up.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const MAX_ID_LEN: usize = 64;

fn valid_identifier(s: &str) -> bool {
    !s.is_empty() && s.len() <= MAX_ID_LEN && !s.chars().any(|c| c.is_whitespace())
}

/// Identifier for a ship under the compliance scheme.
///
/// Keys the compliance snapshot history and the banking ledger
/// (always paired with a compliance year).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShipId(String);

impl ShipId {
    /// Create a ship identifier, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidShipId`] if the value is empty,
    /// longer than 64 characters, or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !valid_identifier(&s) {
            return Err(ValidationError::InvalidShipId(s));
        }
        Ok(Self(s))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a route in the catalog.
///
/// Routes are the unit the comparison engine ranks against the baseline,
/// and the source records CB snapshots are computed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RouteId(String);

impl RouteId {
    /// Create a route identifier, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRouteId`] if the value is empty,
    /// longer than 64 characters, or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !valid_identifier(&s) {
            return Err(ValidationError::InvalidRouteId(s));
        }
        Ok(Self(s))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RouteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ship_id_accepts_plain_identifier() {
        let id = ShipId::new("R001").unwrap();
        assert_eq!(id.as_str(), "R001");
        assert_eq!(format!("{id}"), "R001");
    }

    #[test]
    fn ship_id_rejects_empty() {
        assert!(matches!(
            ShipId::new(""),
            Err(ValidationError::InvalidShipId(_))
        ));
    }

    #[test]
    fn ship_id_rejects_whitespace() {
        assert!(ShipId::new("R 001").is_err());
        assert!(ShipId::new("R001\n").is_err());
    }

    #[test]
    fn ship_id_rejects_overlong() {
        let long = "x".repeat(65);
        assert!(ShipId::new(long).is_err());
        let max = "x".repeat(64);
        assert!(ShipId::new(max).is_ok());
    }

    #[test]
    fn route_id_rejects_empty_and_whitespace() {
        assert!(matches!(
            RouteId::new(""),
            Err(ValidationError::InvalidRouteId(_))
        ));
        assert!(RouteId::new("R 2").is_err());
    }

    #[test]
    fn serde_round_trip_is_transparent() {
        let id = RouteId::new("R042").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"R042\"");
        let back: RouteId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
