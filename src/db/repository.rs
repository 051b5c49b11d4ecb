//! Repository traits shared by the PostgreSQL and in-memory stores.

use crate::db::{DailyTotals, DateRange, NewUser, NewVesselData, User, VesselData, VesselFilter};
use async_trait::async_trait;
use thiserror::Error;

/// Record store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Query or connection failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A user with this username already exists.
    #[error("username already exists: {0}")]
    Duplicate(String),
}

/// Read/append access to vessel rate observations.
#[async_trait]
pub trait VesselRepository: Send + Sync {
    /// Observations matching `filter`, ascending by date then insertion order.
    async fn list(&self, filter: &VesselFilter) -> Result<Vec<VesselData>, StoreError>;

    /// Appends one observation and returns it with its assigned id.
    async fn insert(&self, record: NewVesselData) -> Result<VesselData, StoreError>;

    /// Per-date sums of both rates within `range`, ascending by date.
    /// Dates without observations are omitted.
    async fn aggregate_by_date(&self, range: &DateRange) -> Result<Vec<DailyTotals>, StoreError>;

    /// Total number of stored observations.
    async fn count(&self) -> Result<i64, StoreError>;

    /// Deletes every observation and inserts `records` in one step.
    /// Returns the number of rows inserted.
    async fn replace_all(&self, records: Vec<NewVesselData>) -> Result<usize, StoreError>;
}

/// Lookup and creation of application users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Finds a user by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Stores a new user. Fails with [`StoreError::Duplicate`] if the
    /// username is taken.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;
}
