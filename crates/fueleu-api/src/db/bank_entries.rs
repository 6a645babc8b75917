//! Banking ledger persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `bank_entries` table.
//! The ledger is append-only: entries are never updated or deleted, and
//! the banked balance is always derived by summation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::BankEntryRecord;

/// Append a ledger entry.
pub async fn insert(pool: &PgPool, record: &BankEntryRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO bank_entries (id, ship_id, year, amount_gco2eq, note, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(record.id)
    .bind(&record.ship_id)
    .bind(record.year)
    .bind(record.amount_gco2eq)
    .bind(&record.note)
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Recompute the banked balance for a `(ship_id, year)` pair from the log.
///
/// This is the authoritative figure; any in-memory sum must match it.
pub async fn banked_sum(pool: &PgPool, ship_id: &str, year: i32) -> Result<f64, sqlx::Error> {
    let row: (Option<f64>,) = sqlx::query_as(
        "SELECT SUM(amount_gco2eq) FROM bank_entries WHERE ship_id = $1 AND year = $2",
    )
    .bind(ship_id)
    .bind(year)
    .fetch_one(pool)
    .await?;

    Ok(row.0.unwrap_or(0.0))
}

/// Load all ledger entries from the database into the in-memory store on
/// startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<BankEntryRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, BankEntryRow>(
        "SELECT id, ship_id, year, amount_gco2eq, note, created_at
         FROM bank_entries ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(BankEntryRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct BankEntryRow {
    id: Uuid,
    ship_id: String,
    year: i32,
    amount_gco2eq: f64,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

impl BankEntryRow {
    fn into_record(self) -> BankEntryRecord {
        BankEntryRecord {
            id: self.id,
            ship_id: self.ship_id,
            year: self.year,
            amount_gco2eq: self.amount_gco2eq,
            note: self.note,
            created_at: self.created_at,
        }
    }
}
