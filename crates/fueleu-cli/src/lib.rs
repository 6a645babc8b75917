//! # fueleu-cli — Command-Line Tools for the FuelEU Compliance Stack
//!
//! Offline access to the compliance engine, without the API server:
//!
//! - `fueleu cb` — compute carbon balance and energy for one reporting
//!   period.
//! - `fueleu pool` — run the greedy pool allocator over a members file.
//! - `fueleu compare` — percent-difference and compliance of a candidate
//!   intensity against a baseline.
//!
//! Each subcommand prints its result as JSON on stdout; validation
//! failures are reported on stderr with a non-zero exit code.

pub mod balance;
pub mod compare;
pub mod pool;
