//! # fueleu-api — Axum API Services for the FuelEU Compliance Stack
//!
//! The HTTP facade over `fueleu-engine`. Serves the route catalog,
//! carbon-balance computation, the banking ledger, pool allocation, and
//! baseline comparison.
//!
//! ## API Surface
//!
//! | Prefix            | Module                  | Domain                   |
//! |-------------------|-------------------------|--------------------------|
//! | `/routes/*`       | [`routes::catalog`]     | Catalog + baseline + comparison |
//! | `/compliance/*`   | [`routes::compliance`]  | CB computation & snapshots |
//! | `/banking/*`      | [`routes::banking`]     | Banking ledger           |
//! | `/pools`          | [`routes::pools`]       | Pool allocation          |
//! | `/openapi.json`   | [`openapi`]             | OpenAPI spec             |
//! | `/health`         | (inline)                | Liveness probe           |
//!
//! ## Architecture
//!
//! No business logic in route handlers — arithmetic and validation rules
//! live in `fueleu-engine`; handlers delegate and map error kinds to HTTP
//! statuses via [`AppError`]. Reads come from in-memory stores; writes go
//! through to Postgres when `DATABASE_URL` is configured.

pub mod db;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// The health probe is mounted alongside the API routes; there is no auth
/// layer — this facade is deployed behind the operator's ingress.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::catalog::router())
        .merge(routes::compliance::router())
        .merge(routes::banking::router())
        .merge(routes::pools::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new().route("/health", axum::routing::get(health));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — returns 200 if the process is running.
async fn health() -> &'static str {
    "ok"
}
