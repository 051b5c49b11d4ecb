//! # VesselHire Backend - REST API Server
//!
//! A REST API for tracking vessel hire rates against market rates over time.
//! Built with [Axum](https://crates.io/crates/axum) for async HTTP handling,
//! [sqlx](https://crates.io/crates/sqlx) for PostgreSQL access, and provides
//! OpenAPI/Swagger documentation via [utoipa](https://crates.io/crates/utoipa).
//! The same process serves the prebuilt single-page frontend.
//!
//! ## Key Features
//!
//! - **Vessel Rate Records**: List observations filtered by vessel and date
//!   range; staff users can append new observations.
//!
//! - **Daily Aggregates**: Hire and market rates summed per date across all
//!   vessels, ready for charting.
//!
//! - **JWT Authentication**: Access/refresh token pairs carrying role claims,
//!   with refresh token revocation.
//!
//! - **Pluggable Store**: PostgreSQL when `DATABASE_URL` is set, an in-memory
//!   store (bootstrapped with demo data) otherwise.
//!
//! - **Structured Logging**: Request tracing with `tower-http`.
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Route handlers, authentication extractor and router |
//! | [`auth`] | Password verification and token issuance |
//! | [`commands`] | Seed, demo users and frontend dev server |
//! | [`config`] | TOML + environment configuration |
//! | [`db`] | Row types and repositories (PostgreSQL, memory) |
//! | [`error`] | API error types with `IntoResponse` implementation |
//! | [`models`] | Request/response DTOs with OpenAPI schemas |
//! | [`state`] | Application state management |
//! | [`vessels`] | Vessel access and aggregation |
//!
//! ## API Endpoints
//!
//! | Method | Endpoint | Access | Description |
//! |--------|----------|--------|-------------|
//! | GET | `/health` | public | Health check |
//! | POST | `/api/login` | public | Obtain token pair |
//! | POST | `/api/token/refresh` | public | New access token |
//! | POST | `/api/token/revoke` | public | Revoke refresh token |
//! | GET | `/api/vessels` | authenticated | List observations |
//! | POST | `/api/vessels` | staff | Add observation |
//! | GET | `/api/vessels/aggregate` | staff | Daily totals |
//!
//! ## Example Usage
//!
//! ```bash
//! # Development mode with in-memory store and demo data
//! DEBUG=true cargo run
//!
//! # Against PostgreSQL
//! DATABASE_URL=postgres://localhost/vesselhire SECRET_KEY=change-me cargo run -- serve
//!
//! # Seed demo data and accounts
//! cargo run -- seed
//! cargo run -- create-demo-users
//!
//! # Log in and list records
//! TOKEN=$(curl -s -X POST http://localhost:8000/api/login \
//!   -H "Content-Type: application/json" \
//!   -d '{"username": "admin", "password": "admin123"}' | jq -r .access)
//! curl -H "Authorization: Bearer $TOKEN" \
//!   "http://localhost:8000/api/vessels?vessel=Evergreen&start_date=2024-01-01"
//! ```

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod state;
pub mod vessels;
