//! PostgreSQL pool backing [`crate::db::PgStore`].

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::info;

/// How long a request waits for a free connection before failing.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle to the vessel/user database.
#[derive(Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Connects to `database_url` (the configured `DATABASE_URL`), opening at
    /// most `max_connections` connections.
    ///
    /// # Errors
    /// Returns an error if the server is unreachable or rejects the login.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await?;

        info!(max_connections, "Connected to vessel database");
        Ok(Self { pool })
    }

    /// The pool used by the repositories.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates or upgrades the `vessel_data` and `users` tables from the
    /// bundled `migrations/` directory.
    ///
    /// # Errors
    /// Returns an error if a migration fails or the history is inconsistent.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("vessel_data and users tables are up to date");
        Ok(())
    }
}
