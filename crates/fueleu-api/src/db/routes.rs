//! Route catalog persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `routes` table.
//! The one mutable column is `is_baseline`; [`set_baseline`] flips it
//! inside a transaction so the clear-then-set is atomic.

use sqlx::PgPool;

use crate::state::RouteRecord;

/// Insert a new route record.
pub async fn insert(pool: &PgPool, record: &RouteRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO routes (route_id, vessel_type, fuel_type, year, ghg_intensity,
         fuel_consumption_t, distance_km, total_emissions_t, is_baseline)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(&record.route_id)
    .bind(&record.vessel_type)
    .bind(&record.fuel_type)
    .bind(record.year)
    .bind(record.ghg_intensity)
    .bind(record.fuel_consumption_t)
    .bind(record.distance_km)
    .bind(record.total_emissions_t)
    .bind(record.is_baseline)
    .execute(pool)
    .await?;

    Ok(())
}

/// Set `route_id` as the single baseline route.
///
/// Clears every baseline flag and sets the new one in one transaction.
/// Returns `false` (after rolling back the clear) if the route does not
/// exist.
pub async fn set_baseline(pool: &PgPool, route_id: &str) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE routes SET is_baseline = FALSE WHERE is_baseline")
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("UPDATE routes SET is_baseline = TRUE WHERE route_id = $1")
        .bind(route_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    tx.commit().await?;
    Ok(true)
}

/// Load all routes from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<RouteRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, RouteRow>(
        "SELECT route_id, vessel_type, fuel_type, year, ghg_intensity,
         fuel_consumption_t, distance_km, total_emissions_t, is_baseline
         FROM routes ORDER BY route_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(RouteRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct RouteRow {
    route_id: String,
    vessel_type: String,
    fuel_type: String,
    year: i32,
    ghg_intensity: f64,
    fuel_consumption_t: f64,
    distance_km: f64,
    total_emissions_t: f64,
    is_baseline: bool,
}

impl RouteRow {
    fn into_record(self) -> RouteRecord {
        RouteRecord {
            route_id: self.route_id,
            vessel_type: self.vessel_type,
            fuel_type: self.fuel_type,
            year: self.year,
            ghg_intensity: self.ghg_intensity,
            fuel_consumption_t: self.fuel_consumption_t,
            distance_km: self.distance_km,
            total_emissions_t: self.total_emissions_t,
            is_baseline: self.is_baseline,
        }
    }
}
