//! # Banking API
//!
//! HTTP surface for CB banking:
//!
//! - **GET `/banking/records`** — ledger entries plus the recomputed
//!   banked sum for a ship/year
//! - **POST `/banking/bank`** — bank surplus against the latest snapshot
//! - **POST `/banking/apply`** — apply banked CB against a deficit
//!
//! Both write paths run validate-and-append under the ledger store's
//! write lock (see `AppState`), so concurrent requests cannot observe the
//! same pre-write balance. The reported `banked_sum` is always re-derived
//! by summing the log.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use fueleu_core::ShipId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::{AppState, BankEntryRecord};

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for both banking operations.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BankingRequest {
    /// Ship the operation applies to.
    pub ship_id: String,
    /// Compliance year.
    pub year: i32,
    /// Amount to bank or apply, gCO₂e. Must be positive.
    pub amount: f64,
}

impl Validate for BankingRequest {
    fn validate(&self) -> Result<(), String> {
        ShipId::new(self.ship_id.clone()).map_err(|e| e.to_string())?;
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err("amount must be a positive number".to_string());
        }
        Ok(())
    }
}

/// Query parameters for the ledger listing endpoint.
#[derive(Debug, Deserialize)]
pub struct BankingRecordsParams {
    /// Ship to list entries for.
    pub ship_id: String,
    /// Compliance year.
    pub year: i32,
}

/// Response for the ledger listing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BankingRecordsResponse {
    /// Ledger entries, newest first.
    pub entries: Vec<BankEntryRecord>,
    /// The banked balance, recomputed from the entries.
    pub banked_sum: f64,
}

/// Response for both banking operations.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BankingResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The banked balance after the operation.
    pub banked_sum: f64,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Construct the banking router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/banking/records", get(list_records))
        .route("/banking/bank", post(bank_surplus))
        .route("/banking/apply", post(apply_banked))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /banking/records — Ledger entries and banked sum for a ship/year.
#[utoipa::path(
    get,
    path = "/banking/records",
    params(
        ("ship_id" = String, Query, description = "Ship ID"),
        ("year" = i32, Query, description = "Compliance year"),
    ),
    responses(
        (status = 200, description = "Ledger entries and banked sum", body = BankingRecordsResponse),
    ),
    tag = "banking"
)]
async fn list_records(
    State(state): State<AppState>,
    Query(params): Query<BankingRecordsParams>,
) -> Json<BankingRecordsResponse> {
    Json(BankingRecordsResponse {
        entries: state.bank_entries_for(&params.ship_id, params.year),
        banked_sum: state.banked_sum(&params.ship_id, params.year),
    })
}

/// POST /banking/bank — Bank surplus CB for later use.
#[utoipa::path(
    post,
    path = "/banking/bank",
    request_body = BankingRequest,
    responses(
        (status = 200, description = "Surplus banked", body = BankingResponse),
        (status = 404, description = "No snapshot for the ship/year", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "banking"
)]
async fn bank_surplus(
    State(state): State<AppState>,
    body: Result<Json<BankingRequest>, JsonRejection>,
) -> Result<Json<BankingResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let ship_id = ShipId::new(req.ship_id)?;

    let record = state.record_deposit(&ship_id, req.year, req.amount)?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::bank_entries::insert(pool, &record).await {
            tracing::error!(entry_id = %record.id, error = %e, "failed to persist bank entry");
            return Err(AppError::Internal(
                "entry recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(Json(BankingResponse {
        message: "CB banked successfully".to_string(),
        banked_sum: state.banked_sum(ship_id.as_str(), req.year),
    }))
}

/// POST /banking/apply — Apply banked CB against a deficit.
#[utoipa::path(
    post,
    path = "/banking/apply",
    request_body = BankingRequest,
    responses(
        (status = 200, description = "Banked CB applied", body = BankingResponse),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "banking"
)]
async fn apply_banked(
    State(state): State<AppState>,
    body: Result<Json<BankingRequest>, JsonRejection>,
) -> Result<Json<BankingResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let ship_id = ShipId::new(req.ship_id)?;

    let (record, new_banked_sum) = state.record_withdrawal(&ship_id, req.year, req.amount)?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::bank_entries::insert(pool, &record).await {
            tracing::error!(entry_id = %record.id, error = %e, "failed to persist bank entry");
            return Err(AppError::Internal(
                "entry recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(Json(BankingResponse {
        message: "Banked CB applied successfully".to_string(),
        banked_sum: new_banked_sum,
    }))
}
