//! Token endpoints: login, refresh and revoke.

use crate::error::ApiError;
use crate::models::{
    AccessTokenResponse, LoginRequest, RefreshRequest, TokenPairResponse, UserSummary,
};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::info;

/// Obtain an access/refresh token pair.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPairResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let Json(body) = body?;
    let (Some(username), Some(password)) = (body.username, body.password) else {
        return Err(ApiError::InvalidRequest(
            "username and password are required".to_string(),
        ));
    };

    let (user, pair) = state
        .auth
        .issue_token(state.users.as_ref(), &username, &password)
        .await?;
    info!(username = %user.username, is_staff = user.is_staff, "user logged in");

    Ok(Json(TokenPairResponse {
        access: pair.access,
        refresh: pair.refresh,
        user: UserSummary {
            username: user.username,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
        },
    }))
}

/// Exchange a refresh token for a new access token.
#[utoipa::path(
    post,
    path = "/api/token/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 400, description = "Missing refresh token"),
        (status = 401, description = "Invalid, expired or revoked refresh token")
    ),
    tag = "Authentication"
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let refresh_token = required_refresh(body)?;
    let access = state
        .auth
        .refresh_token(state.users.as_ref(), &refresh_token)
        .await?;
    Ok(Json(AccessTokenResponse { access }))
}

/// Revoke a refresh token.
#[utoipa::path(
    post,
    path = "/api/token/revoke",
    request_body = RefreshRequest,
    responses(
        (status = 204, description = "Refresh token revoked"),
        (status = 400, description = "Missing refresh token"),
        (status = 401, description = "Invalid or already revoked refresh token")
    ),
    tag = "Authentication"
)]
pub async fn revoke(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let refresh_token = required_refresh(body)?;
    state.auth.revoke_token(&refresh_token)?;
    Ok(StatusCode::NO_CONTENT)
}

fn required_refresh(body: Result<Json<RefreshRequest>, JsonRejection>) -> Result<String, ApiError> {
    let Json(body) = body?;
    body.refresh
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::InvalidRequest("refresh token is required".to_string()))
}
