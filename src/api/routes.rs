//! Route configuration.

use crate::api::{auth, handlers};
use crate::state::AppState;
use axum::Router;
use axum::routing::{any, get, post};
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};

/// Creates the API router.
///
/// Every API path also accepts a trailing slash. A known path called with
/// the wrong method gets a JSON 405. Paths outside `/api` and
/// `/health` fall through to the frontend build: existing files are served
/// as-is and everything else gets `index.html` for client-side routing.
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.server.static_dir.clone();
    let spa = ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Authentication
        .route("/api/login", post(auth::login))
        .route("/api/login/", post(auth::login))
        .route("/api/token/refresh", post(auth::refresh))
        .route("/api/token/refresh/", post(auth::refresh))
        .route("/api/token/revoke", post(auth::revoke))
        .route("/api/token/revoke/", post(auth::revoke))
        // Vessel data
        .route(
            "/api/vessels",
            get(handlers::list_vessels).post(handlers::create_vessel),
        )
        .route(
            "/api/vessels/",
            get(handlers::list_vessels).post(handlers::create_vessel),
        )
        .route("/api/vessels/aggregate", get(handlers::aggregate_vessels))
        .route("/api/vessels/aggregate/", get(handlers::aggregate_vessels))
        // Unknown API paths never reach the frontend
        .route("/api", any(handlers::api_not_found))
        .route("/api/{*rest}", any(handlers::api_not_found))
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback_service(spa)
        .with_state(state)
}
