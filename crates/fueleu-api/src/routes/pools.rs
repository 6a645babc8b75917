//! # Pooling API
//!
//! HTTP surface for CB pooling:
//!
//! - **POST `/pools`** — run the greedy allocator over the submitted
//!   members and persist the resulting pool
//! - **GET `/pools`** — list stored pools
//!
//! The allocator's preconditions (non-empty pool, non-negative aggregate
//! CB) surface as 422; a successful allocation is stored atomically with
//! all members.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use fueleu_core::ShipId;
use fueleu_engine::pooling::{allocate, PoolMemberInput};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::{AppState, PoolMemberRecord, PoolRecord};

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// One member in a pool creation request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PoolMemberRequest {
    /// The member ship.
    pub ship_id: String,
    /// Pre-pool carbon balance, gCO₂e.
    pub cb_before: f64,
}

/// Request to create a pool.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePoolRequest {
    /// Allocation year shared by all members.
    pub year: i32,
    /// The members to allocate across.
    pub members: Vec<PoolMemberRequest>,
}

impl Validate for CreatePoolRequest {
    fn validate(&self) -> Result<(), String> {
        if self.members.is_empty() {
            return Err("members must be a non-empty array".to_string());
        }
        for member in &self.members {
            ShipId::new(member.ship_id.clone()).map_err(|e| e.to_string())?;
        }
        let mut seen: Vec<&str> = Vec::with_capacity(self.members.len());
        for member in &self.members {
            if seen.contains(&member.ship_id.as_str()) {
                return Err(format!("duplicate pool member: {}", member.ship_id));
            }
            seen.push(&member.ship_id);
        }
        Ok(())
    }
}

/// Response for pool creation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePoolResponse {
    /// The stored pool's identifier.
    pub pool_id: Uuid,
    /// Allocation year.
    pub year: i32,
    /// Members with allocated balances, in allocation service order.
    pub members: Vec<PoolMemberRecord>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Construct the pooling router.
pub fn router() -> Router<AppState> {
    Router::new().route("/pools", get(list_pools).post(create_pool))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /pools — Allocate and persist a pool.
#[utoipa::path(
    post,
    path = "/pools",
    request_body = CreatePoolRequest,
    responses(
        (status = 201, description = "Pool created", body = CreatePoolResponse),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "pools"
)]
async fn create_pool(
    State(state): State<AppState>,
    body: Result<Json<CreatePoolRequest>, JsonRejection>,
) -> Result<(axum::http::StatusCode, Json<CreatePoolResponse>), AppError> {
    let req = extract_validated_json(body)?;

    let inputs: Vec<PoolMemberInput> = req
        .members
        .iter()
        .map(|m| {
            Ok(PoolMemberInput {
                ship_id: ShipId::new(m.ship_id.clone())?,
                cb_before: m.cb_before,
            })
        })
        .collect::<Result<_, fueleu_core::ValidationError>>()?;

    let allocated = allocate(&inputs)?;

    let record = PoolRecord {
        id: Uuid::new_v4(),
        year: req.year,
        members: allocated
            .into_iter()
            .map(|m| PoolMemberRecord {
                ship_id: m.ship_id.as_str().to_string(),
                cb_before: m.cb_before,
                cb_after: m.cb_after,
            })
            .collect(),
        created_at: Utc::now(),
    };

    state.pools.insert(record.id, record.clone());

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::pools::insert(pool, &record).await {
            tracing::error!(pool_id = %record.id, error = %e, "failed to persist pool");
            return Err(AppError::Internal(
                "pool recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok((
        axum::http::StatusCode::CREATED,
        Json(CreatePoolResponse {
            pool_id: record.id,
            year: record.year,
            members: record.members,
        }),
    ))
}

/// GET /pools — List stored pools, oldest first.
#[utoipa::path(
    get,
    path = "/pools",
    responses(
        (status = 200, description = "Stored pools", body = Vec<PoolRecord>),
    ),
    tag = "pools"
)]
async fn list_pools(State(state): State<AppState>) -> Json<Vec<PoolRecord>> {
    let mut pools = state.pools.list();
    pools.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Json(pools)
}
