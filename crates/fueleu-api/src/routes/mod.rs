//! # API Route Modules
//!
//! Route modules for the FuelEU compliance API surface:
//!
//! - `catalog` — route catalog CRUD, baseline designation, and
//!   baseline comparison.
//! - `compliance` — carbon-balance computation and snapshot history.
//! - `banking` — CB banking: deposits, withdrawals, and ledger listing.
//! - `pools` — pool creation (greedy allocation) and listing.
//!
//! Handlers contain no business logic: validation and arithmetic live in
//! `fueleu-engine`; handlers wire requests to the engine, commit results
//! to the stores (with database write-through when configured), and map
//! engine rejections to HTTP statuses via `AppError`.

pub mod banking;
pub mod catalog;
pub mod compliance;
pub mod pools;
