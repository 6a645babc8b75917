//! Compliance snapshot persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `ship_compliance`
//! table. Snapshots are immutable once created — there are no update
//! operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::SnapshotRecord;

/// Insert a new compliance snapshot.
pub async fn insert(pool: &PgPool, record: &SnapshotRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO ship_compliance (id, ship_id, route_id, year, cb_gco2eq,
         energy_mj, target_gco2eq_per_mj, actual_gco2eq_per_mj, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(record.id)
    .bind(&record.ship_id)
    .bind(&record.route_id)
    .bind(record.year)
    .bind(record.cb_gco2eq)
    .bind(record.energy_mj)
    .bind(record.target_gco2eq_per_mj)
    .bind(record.actual_gco2eq_per_mj)
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all snapshots from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<SnapshotRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, SnapshotRow>(
        "SELECT id, ship_id, route_id, year, cb_gco2eq, energy_mj,
         target_gco2eq_per_mj, actual_gco2eq_per_mj, created_at
         FROM ship_compliance ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(SnapshotRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct SnapshotRow {
    id: Uuid,
    ship_id: String,
    route_id: Option<String>,
    year: i32,
    cb_gco2eq: f64,
    energy_mj: f64,
    target_gco2eq_per_mj: f64,
    actual_gco2eq_per_mj: f64,
    created_at: DateTime<Utc>,
}

impl SnapshotRow {
    fn into_record(self) -> SnapshotRecord {
        SnapshotRecord {
            id: self.id,
            ship_id: self.ship_id,
            route_id: self.route_id,
            year: self.year,
            cb_gco2eq: self.cb_gco2eq,
            energy_mj: self.energy_mj,
            target_gco2eq_per_mj: self.target_gco2eq_per_mj,
            actual_gco2eq_per_mj: self.actual_gco2eq_per_mj,
            created_at: self.created_at,
        }
    }
}
