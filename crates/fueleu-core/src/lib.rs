#![deny(missing_docs)]

//! # fueleu-core — Foundational Types for the FuelEU Compliance Stack
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies — only `serde`, `serde_json`,
//! and `thiserror` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** [`ShipId`] and [`RouteId`] are
//!    distinct types with validated constructors. You cannot pass a route
//!    identifier where a ship identifier is expected, and an empty string
//!    never survives construction.
//!
//! 2. **Quantities are plain `f64` with documented units.** Carbon balance
//!    (gCO₂e), energy (MJ), intensity (gCO₂e/MJ), and fuel consumption
//!    (tonnes) flow through the engine as IEEE doubles; numeric
//!    preconditions (no NaN, no negative fuel mass) are enforced at each
//!    operation's boundary rather than baked into wrapper types, so the
//!    arithmetic in the engine stays legible.
//!
//! 3. **Structured errors with `thiserror`.** No `Box<dyn Error>`, no
//!    `.unwrap()` outside tests.

pub mod constants;
pub mod error;
pub mod identity;
pub mod route;

// Re-export primary types at crate root for ergonomic imports.
pub use constants::{BASELINE_INTENSITY_2024, MJ_PER_TONNE, TARGET_INTENSITY_2025};
pub use error::ValidationError;
pub use identity::{RouteId, ShipId};
pub use route::Route;
