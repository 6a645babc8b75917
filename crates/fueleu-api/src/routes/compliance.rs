//! # Compliance API
//!
//! HTTP surface for carbon-balance computation:
//!
//! - **GET `/compliance/cb`** — compute CB for a route, store a snapshot,
//!   return the computed values (the original dashboard contract: reads
//!   compute-and-store in one call)
//! - **GET `/compliance/snapshots`** — snapshot history for a ship/year
//!
//! Snapshots are append-only; each computation stores a fresh one. The
//! ship is identified by the route it sails, so the snapshot's `ship_id`
//! is the route id.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use fueleu_core::TARGET_INTENSITY_2025;
use fueleu_engine::compute_cb;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::{AppState, SnapshotRecord};

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Query parameters for the CB computation endpoint.
#[derive(Debug, Deserialize)]
pub struct ComputeCbParams {
    /// Route to compute compliance for.
    pub route_id: String,
    /// Compliance year the snapshot is stored under.
    pub year: i32,
    /// Target intensity override, gCO₂e/MJ. Defaults to the 2025 target.
    pub target: Option<f64>,
}

/// Query parameters for the snapshot history endpoint.
#[derive(Debug, Deserialize)]
pub struct SnapshotsParams {
    /// Ship to list snapshots for.
    pub ship_id: String,
    /// Compliance year.
    pub year: i32,
}

/// Response for the CB computation endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComputeCbResponse {
    /// Signed carbon balance, gCO₂e. Positive = surplus.
    pub cb: f64,
    /// Energy of the period, MJ.
    pub energy_mj: f64,
    /// Target intensity used.
    pub target: f64,
    /// Actual (measured) intensity used.
    pub actual: f64,
    /// The route the computation was taken from.
    pub route_id: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Construct the compliance router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/compliance/cb", get(compute_and_store_cb))
        .route("/compliance/snapshots", get(list_snapshots))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /compliance/cb — Compute CB for a route and store a snapshot.
#[utoipa::path(
    get,
    path = "/compliance/cb",
    params(
        ("route_id" = String, Query, description = "Route ID"),
        ("year" = i32, Query, description = "Compliance year"),
        ("target" = Option<f64>, Query, description = "Target intensity override (gCO₂e/MJ)"),
    ),
    responses(
        (status = 200, description = "Computed carbon balance", body = ComputeCbResponse),
        (status = 404, description = "Route not found", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid input", body = crate::error::ErrorBody),
    ),
    tag = "compliance"
)]
async fn compute_and_store_cb(
    State(state): State<AppState>,
    Query(params): Query<ComputeCbParams>,
) -> Result<Json<ComputeCbResponse>, AppError> {
    let route = state
        .routes
        .get(&params.route_id)
        .ok_or_else(|| AppError::NotFound(format!("route {} not found", params.route_id)))?;

    let target = params.target.unwrap_or(TARGET_INTENSITY_2025);
    let actual = route.ghg_intensity;

    let outcome = compute_cb(target, actual, route.fuel_consumption_t)?;

    let record = SnapshotRecord {
        id: Uuid::new_v4(),
        ship_id: route.route_id.clone(),
        route_id: Some(route.route_id.clone()),
        year: params.year,
        cb_gco2eq: outcome.cb_gco2eq,
        energy_mj: outcome.energy_mj,
        target_gco2eq_per_mj: target,
        actual_gco2eq_per_mj: actual,
        created_at: Utc::now(),
    };

    state.snapshots.insert(record.id, record.clone());

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::snapshots::insert(pool, &record).await {
            tracing::error!(snapshot_id = %record.id, error = %e, "failed to persist snapshot");
            return Err(AppError::Internal(
                "snapshot recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(Json(ComputeCbResponse {
        cb: outcome.cb_gco2eq,
        energy_mj: outcome.energy_mj,
        target,
        actual,
        route_id: route.route_id,
    }))
}

/// GET /compliance/snapshots — Snapshot history for a ship/year, newest first.
#[utoipa::path(
    get,
    path = "/compliance/snapshots",
    params(
        ("ship_id" = String, Query, description = "Ship ID"),
        ("year" = i32, Query, description = "Compliance year"),
    ),
    responses(
        (status = 200, description = "Snapshot history", body = Vec<SnapshotRecord>),
    ),
    tag = "compliance"
)]
async fn list_snapshots(
    State(state): State<AppState>,
    Query(params): Query<SnapshotsParams>,
) -> Json<Vec<SnapshotRecord>> {
    Json(state.snapshots_for(&params.ship_id, params.year))
}
