//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "FuelEU Compliance API",
        version = "0.1.0",
        description = "Carbon-balance compliance services: route catalog, CB computation, banking ledger, pool allocation, and baseline comparison.",
        license(name = "Apache-2.0")
    ),
    paths(
        // Catalog
        crate::routes::catalog::list_routes,
        crate::routes::catalog::create_route,
        crate::routes::catalog::get_route,
        crate::routes::catalog::set_baseline,
        crate::routes::catalog::comparison,
        // Compliance
        crate::routes::compliance::compute_and_store_cb,
        crate::routes::compliance::list_snapshots,
        // Banking
        crate::routes::banking::list_records,
        crate::routes::banking::bank_surplus,
        crate::routes::banking::apply_banked,
        // Pools
        crate::routes::pools::create_pool,
        crate::routes::pools::list_pools,
    ),
    components(schemas(
        // State record types
        crate::state::RouteRecord,
        crate::state::SnapshotRecord,
        crate::state::BankEntryRecord,
        crate::state::PoolMemberRecord,
        crate::state::PoolRecord,
        // Request / response types
        crate::routes::catalog::CreateRouteRequest,
        crate::routes::catalog::ComparisonRowResponse,
        crate::routes::catalog::ComparisonResponse,
        crate::routes::catalog::BaselineResponse,
        crate::routes::compliance::ComputeCbResponse,
        crate::routes::banking::BankingRequest,
        crate::routes::banking::BankingRecordsResponse,
        crate::routes::banking::BankingResponse,
        crate::routes::pools::PoolMemberRequest,
        crate::routes::pools::CreatePoolRequest,
        crate::routes::pools::CreatePoolResponse,
        // Errors
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "catalog", description = "Route catalog and baseline"),
        (name = "compliance", description = "Carbon-balance computation"),
        (name = "banking", description = "CB banking ledger"),
        (name = "pools", description = "CB pooling"),
    )
)]
pub struct ApiDoc;

/// Router serving the assembled spec.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_openapi))
}

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
