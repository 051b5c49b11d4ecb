//! Record store: PostgreSQL connection, row types and repositories.
//!
//! The HTTP layer only sees the [`VesselRepository`] and [`UserRepository`]
//! traits. [`PgStore`] backs them with PostgreSQL; [`MemoryStore`] keeps
//! everything in process and is used when no database is configured.

mod memory;
mod pool;
mod postgres;
mod repository;
mod schema;

pub use memory::MemoryStore;
pub use pool::DatabasePool;
pub use postgres::PgStore;
pub use repository::{StoreError, UserRepository, VesselRepository};
pub use schema::*;
