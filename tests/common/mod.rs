//! Shared helpers for HTTP-level tests.
#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;
use vesselhire_backend::api::create_router;
use vesselhire_backend::commands::demo_users::create_demo_users;
use vesselhire_backend::config::Config;
use vesselhire_backend::state::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

pub const INDEX_HTML: &str = "<!doctype html><div id=\"root\"></div>";

/// Router over a fresh in-memory store with the demo accounts.
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    _static_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let static_dir = TempDir::new().unwrap();
        std::fs::write(static_dir.path().join("index.html"), INDEX_HTML).unwrap();
        std::fs::create_dir(static_dir.path().join("assets")).unwrap();
        std::fs::write(static_dir.path().join("assets/app.js"), "console.log('app')").unwrap();

        let mut config = Config::development();
        config.server.static_dir = static_dir.path().to_path_buf();
        config.auth.secret = TEST_SECRET.to_string();
        config.auth.password_hash_cost = 4;

        let state = Arc::new(AppState::in_memory(config));
        create_demo_users(&state.auth, state.users.as_ref())
            .await
            .unwrap();

        Self {
            router: create_router(Arc::clone(&state)),
            state,
            _static_dir: static_dir,
        }
    }

    /// Sends a request and returns the status and body parsed as JSON
    /// (`Value::Null` for empty or non-JSON bodies).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.send_raw(request).await;
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    pub async fn login(&self, username: &str, password: &str) -> Value {
        let (status, body) = self
            .send(post_json(
                "/api/login",
                None,
                serde_json::json!({ "username": username, "password": password }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body
    }

    pub async fn admin_token(&self) -> String {
        access_of(&self.login("admin", "admin123").await)
    }

    pub async fn user_token(&self) -> String {
        access_of(&self.login("user", "user123").await)
    }
}

pub fn access_of(body: &Value) -> String {
    body["access"].as_str().expect("access token").to_string()
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn vessel(name: &str, date: &str, hire: i64, market: i64) -> Value {
    serde_json::json!({
        "vessel_name": name,
        "date": date,
        "hire_rate": hire,
        "market_rate": market,
    })
}
