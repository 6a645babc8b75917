//! # Database Persistence Layer
//!
//! Postgres persistence via SQLx. The database is **optional**: when
//! `DATABASE_URL` is set, every write goes through to Postgres and the
//! in-memory stores are hydrated from it on startup; when absent, the API
//! runs in-memory only (development and testing mode).
//!
//! ## Tables
//!
//! - `routes` — the route catalog, including the single baseline flag
//! - `ship_compliance` — append-only compliance snapshots
//! - `bank_entries` — the append-only banking ledger
//! - `pools` / `pool_members` — stored allocation runs
//!
//! The banked balance is not a column anywhere: it is always
//! `SUM(amount_gco2eq)` over `bank_entries` for a `(ship_id, year)` pair.

pub mod bank_entries;
pub mod pools;
pub mod routes;
pub mod snapshots;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 State will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}
