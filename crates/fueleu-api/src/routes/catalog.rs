//! # Route Catalog API
//!
//! HTTP surface for the route catalog:
//!
//! - **GET `/routes`** — list the catalog
//! - **POST `/routes`** — create a route record
//! - **GET `/routes/comparison`** — compare every route against the baseline
//! - **GET `/routes/:route_id`** — fetch one route
//! - **POST `/routes/:route_id/baseline`** — designate the baseline route
//!
//! The baseline flag is exclusive: designating a new baseline atomically
//! clears the previous holder, in the store and (when configured) in the
//! database transaction.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use fueleu_core::{Route, RouteId, TARGET_INTENSITY_2025};
use fueleu_engine::comparison::compare_routes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::{AppState, RouteRecord};

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to create a route record.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRouteRequest {
    /// Catalog identifier.
    pub route_id: String,
    /// Vessel type.
    pub vessel_type: String,
    /// Fuel type.
    pub fuel_type: String,
    /// Reporting year.
    pub year: i32,
    /// Measured greenhouse-gas intensity, gCO₂e/MJ.
    pub ghg_intensity: f64,
    /// Fuel consumed, tonnes.
    pub fuel_consumption_t: f64,
    /// Route distance, km.
    pub distance_km: f64,
    /// Total emissions, tonnes CO₂e.
    pub total_emissions_t: f64,
}

impl Validate for CreateRouteRequest {
    fn validate(&self) -> Result<(), String> {
        RouteId::new(self.route_id.clone()).map_err(|e| e.to_string())?;
        if self.vessel_type.trim().is_empty() {
            return Err("vessel_type must not be empty".to_string());
        }
        if self.fuel_type.trim().is_empty() {
            return Err("fuel_type must not be empty".to_string());
        }
        if !self.ghg_intensity.is_finite() || self.ghg_intensity < 0.0 {
            return Err("ghg_intensity must be a non-negative number".to_string());
        }
        if !self.fuel_consumption_t.is_finite() || self.fuel_consumption_t < 0.0 {
            return Err("fuel_consumption_t must be a non-negative number".to_string());
        }
        if !self.distance_km.is_finite() || self.distance_km < 0.0 {
            return Err("distance_km must be a non-negative number".to_string());
        }
        if !self.total_emissions_t.is_finite() || self.total_emissions_t < 0.0 {
            return Err("total_emissions_t must be a non-negative number".to_string());
        }
        Ok(())
    }
}

/// Query parameters for the comparison endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct ComparisonQueryParams {
    /// Target intensity threshold, gCO₂e/MJ. Defaults to the 2025 target.
    pub target: Option<f64>,
}

/// One comparison row in the response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComparisonRowResponse {
    /// The compared route.
    pub route_id: String,
    /// Vessel type.
    pub vessel_type: String,
    /// Fuel type.
    pub fuel_type: String,
    /// Reporting year.
    pub year: i32,
    /// The route's measured intensity, gCO₂e/MJ.
    pub ghg_intensity: f64,
    /// Percent difference from the baseline intensity.
    pub percent_difference: f64,
    /// Whether the route meets the target threshold.
    pub compliant: bool,
}

/// Response for the comparison endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComparisonResponse {
    /// The baseline route all others are compared against.
    pub baseline: RouteRecord,
    /// The target threshold used for the compliance flag.
    pub target: f64,
    /// One row per non-baseline route.
    pub comparisons: Vec<ComparisonRowResponse>,
}

/// Confirmation response for baseline designation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BaselineResponse {
    /// The newly designated baseline route.
    pub route_id: String,
    /// Human-readable confirmation.
    pub message: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Construct the route catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/routes", get(list_routes).post(create_route))
        .route("/routes/comparison", get(comparison))
        .route("/routes/:route_id", get(get_route))
        .route("/routes/:route_id/baseline", post(set_baseline))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /routes — List the route catalog.
#[utoipa::path(
    get,
    path = "/routes",
    responses(
        (status = 200, description = "List of routes", body = Vec<RouteRecord>),
    ),
    tag = "catalog"
)]
async fn list_routes(State(state): State<AppState>) -> Json<Vec<RouteRecord>> {
    let mut routes = state.routes.list();
    routes.sort_by(|a, b| a.route_id.cmp(&b.route_id));
    Json(routes)
}

/// POST /routes — Create a route record.
#[utoipa::path(
    post,
    path = "/routes",
    request_body = CreateRouteRequest,
    responses(
        (status = 201, description = "Route created", body = RouteRecord),
        (status = 409, description = "Route already exists", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "catalog"
)]
async fn create_route(
    State(state): State<AppState>,
    body: Result<Json<CreateRouteRequest>, JsonRejection>,
) -> Result<(axum::http::StatusCode, Json<RouteRecord>), AppError> {
    let req = extract_validated_json(body)?;

    if state.routes.contains(&req.route_id) {
        return Err(AppError::Conflict(format!(
            "route {} already exists",
            req.route_id
        )));
    }

    let record = RouteRecord {
        route_id: req.route_id,
        vessel_type: req.vessel_type,
        fuel_type: req.fuel_type,
        year: req.year,
        ghg_intensity: req.ghg_intensity,
        fuel_consumption_t: req.fuel_consumption_t,
        distance_km: req.distance_km,
        total_emissions_t: req.total_emissions_t,
        is_baseline: false,
    };

    state.routes.insert(record.route_id.clone(), record.clone());

    // Write-through. Failure is surfaced because the in-memory record would
    // be lost on restart.
    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::routes::insert(pool, &record).await {
            tracing::error!(route_id = %record.route_id, error = %e, "failed to persist route");
            return Err(AppError::Internal(
                "route recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok((axum::http::StatusCode::CREATED, Json(record)))
}

/// GET /routes/:route_id — Fetch one route.
#[utoipa::path(
    get,
    path = "/routes/{route_id}",
    params(("route_id" = String, Path, description = "Route ID")),
    responses(
        (status = 200, description = "Route found", body = RouteRecord),
        (status = 404, description = "Route not found", body = crate::error::ErrorBody),
    ),
    tag = "catalog"
)]
async fn get_route(
    State(state): State<AppState>,
    Path(route_id): Path<String>,
) -> Result<Json<RouteRecord>, AppError> {
    state
        .routes
        .get(&route_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("route {route_id} not found")))
}

/// POST /routes/:route_id/baseline — Designate the baseline route.
#[utoipa::path(
    post,
    path = "/routes/{route_id}/baseline",
    params(("route_id" = String, Path, description = "Route ID")),
    responses(
        (status = 200, description = "Baseline updated", body = BaselineResponse),
        (status = 404, description = "Route not found", body = crate::error::ErrorBody),
    ),
    tag = "catalog"
)]
async fn set_baseline(
    State(state): State<AppState>,
    Path(route_id): Path<String>,
) -> Result<Json<BaselineResponse>, AppError> {
    if !state.set_baseline(&route_id) {
        return Err(AppError::NotFound(format!("route {route_id} not found")));
    }

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::routes::set_baseline(pool, &route_id).await {
            tracing::error!(route_id = %route_id, error = %e, "failed to persist baseline flag");
            return Err(AppError::Internal(
                "baseline updated in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(Json(BaselineResponse {
        route_id,
        message: "Baseline updated".to_string(),
    }))
}

/// GET /routes/comparison — Compare every route against the baseline.
#[utoipa::path(
    get,
    path = "/routes/comparison",
    params(("target" = Option<f64>, Query, description = "Target intensity threshold (gCO₂e/MJ)")),
    responses(
        (status = 200, description = "Comparison against the baseline", body = ComparisonResponse),
        (status = 404, description = "No baseline designated", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid baseline or target", body = crate::error::ErrorBody),
    ),
    tag = "catalog"
)]
async fn comparison(
    State(state): State<AppState>,
    Query(params): Query<ComparisonQueryParams>,
) -> Result<Json<ComparisonResponse>, AppError> {
    let target = params.target.unwrap_or(TARGET_INTENSITY_2025);
    if !target.is_finite() {
        return Err(AppError::Validation(
            "target must be a finite number".to_string(),
        ));
    }

    let baseline_record = state.find_baseline().ok_or_else(|| {
        AppError::NotFound("no baseline designated; set a baseline route first".to_string())
    })?;

    let baseline = Route::try_from(&baseline_record)
        .map_err(|e| AppError::Internal(format!("corrupt baseline record: {e}")))?;

    let routes: Vec<Route> = state
        .routes
        .list()
        .iter()
        .map(Route::try_from)
        .collect::<Result<_, _>>()
        .map_err(|e| AppError::Internal(format!("corrupt route record: {e}")))?;

    let mut rows = compare_routes(&baseline, &routes, target)?;
    rows.sort_by(|a, b| a.route_id.cmp(&b.route_id));

    Ok(Json(ComparisonResponse {
        baseline: baseline_record,
        target,
        comparisons: rows
            .into_iter()
            .map(|row| ComparisonRowResponse {
                route_id: row.route_id.as_str().to_string(),
                vessel_type: row.vessel_type,
                fuel_type: row.fuel_type,
                year: row.year,
                ghg_intensity: row.ghg_intensity,
                percent_difference: row.percent_difference,
                compliant: row.compliant,
            })
            .collect(),
    }))
}
