//! # Validation Errors
//!
//! Construction-time validation failures for domain primitive newtypes,
//! built with `thiserror`. Each variant carries the rejected input so
//! operators can diagnose bad data without guesswork.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Ship identifier fails format validation.
    #[error("invalid ship id: \"{0}\" (expected 1-64 characters, no whitespace)")]
    InvalidShipId(String),

    /// Route identifier fails format validation.
    #[error("invalid route id: \"{0}\" (expected 1-64 characters, no whitespace)")]
    InvalidRouteId(String),
}
