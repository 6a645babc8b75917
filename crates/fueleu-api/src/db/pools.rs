//! Pool persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `pools` and
//! `pool_members` tables. A pool and its members are written in one
//! transaction; pools are immutable once created.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::{PoolMemberRecord, PoolRecord};

/// Insert a pool and its members transactionally.
pub async fn insert(pool: &PgPool, record: &PoolRecord) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO pools (id, year, created_at) VALUES ($1, $2, $3)")
        .bind(record.id)
        .bind(record.year)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await?;

    for member in &record.members {
        sqlx::query(
            "INSERT INTO pool_members (pool_id, ship_id, cb_before, cb_after)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(record.id)
        .bind(&member.ship_id)
        .bind(member.cb_before)
        .bind(member.cb_after)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Load all pools (with members) from the database into the in-memory
/// store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<PoolRecord>, sqlx::Error> {
    let pool_rows = sqlx::query_as::<_, PoolRow>(
        "SELECT id, year, created_at FROM pools ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    let member_rows = sqlx::query_as::<_, MemberRow>(
        "SELECT pool_id, ship_id, cb_before, cb_after
         FROM pool_members ORDER BY cb_before DESC",
    )
    .fetch_all(pool)
    .await?;

    let mut records: Vec<PoolRecord> = pool_rows
        .into_iter()
        .map(|row| PoolRecord {
            id: row.id,
            year: row.year,
            members: Vec::new(),
            created_at: row.created_at,
        })
        .collect();

    for member in member_rows {
        if let Some(record) = records.iter_mut().find(|p| p.id == member.pool_id) {
            record.members.push(PoolMemberRecord {
                ship_id: member.ship_id,
                cb_before: member.cb_before,
                cb_after: member.cb_after,
            });
        }
    }

    Ok(records)
}

/// Internal row types for SQLx mapping.
#[derive(sqlx::FromRow)]
struct PoolRow {
    id: Uuid,
    year: i32,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    pool_id: Uuid,
    ship_id: String,
    cb_before: f64,
    cb_after: f64,
}
