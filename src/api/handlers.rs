//! Vessel data request handlers.

use crate::api::middleware::AuthUser;
use crate::auth::Role;
use crate::db::DailyTotals;
use crate::error::ApiError;
use crate::models::{
    AggregateQuery, CreateVesselRequest, CreateVesselResponse, HealthResponse, VesselQuery,
    VesselRecord,
};
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{OriginalUri, Query, State};
use axum::http::StatusCode;
use std::sync::Arc;

// ============================================================================
// Health Check
// ============================================================================

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Vessel Data
// ============================================================================

/// List vessel rate observations.
#[utoipa::path(
    get,
    path = "/api/vessels",
    params(VesselQuery),
    responses(
        (status = 200, description = "Observations ordered by date", body = Vec<VesselRecord>),
        (status = 400, description = "Malformed date"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer" = [])),
    tag = "Vessels"
)]
pub async fn list_vessels(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    query: Result<Query<VesselQuery>, QueryRejection>,
) -> Result<Json<Vec<VesselRecord>>, ApiError> {
    user.require(Role::Authenticated)?;
    let Query(query) = query?;
    let filter = query.to_filter()?;

    let rows = state.vessels.list(&filter).await?;
    Ok(Json(rows.into_iter().map(VesselRecord::from).collect()))
}

/// Add a vessel rate observation (staff only).
#[utoipa::path(
    post,
    path = "/api/vessels",
    request_body = CreateVesselRequest,
    responses(
        (status = 201, description = "Observation stored", body = CreateVesselResponse),
        (status = 400, description = "Missing or malformed field"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Staff role required")
    ),
    security(("bearer" = [])),
    tag = "Vessels"
)]
pub async fn create_vessel(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    body: Result<Json<CreateVesselRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateVesselResponse>), ApiError> {
    user.require(Role::Staff)?;
    let Json(body) = body?;
    let record = body.validate()?;

    let stored = state.vessels.create(record).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateVesselResponse {
            message: "Vessel data added successfully".to_string(),
            data: stored,
        }),
    ))
}

/// Per-date totals across all vessels (staff only).
#[utoipa::path(
    get,
    path = "/api/vessels/aggregate",
    params(AggregateQuery),
    responses(
        (status = 200, description = "Totals ordered by date", body = Vec<DailyTotals>),
        (status = 400, description = "Malformed date"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Staff role required")
    ),
    security(("bearer" = [])),
    tag = "Vessels"
)]
pub async fn aggregate_vessels(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    query: Result<Query<AggregateQuery>, QueryRejection>,
) -> Result<Json<Vec<DailyTotals>>, ApiError> {
    user.require(Role::Staff)?;
    let Query(query) = query?;
    let range = query.to_range()?;

    let totals = state.vessels.aggregate_by_date(&range).await?;
    Ok(Json(totals))
}

/// Fallback for known paths called with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Fallback for unknown API paths.
pub async fn api_not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
