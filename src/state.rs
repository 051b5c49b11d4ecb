//! Application state management.

use crate::auth::AuthService;
use crate::config::Config;
use crate::db::{DatabasePool, MemoryStore, PgStore, UserRepository};
use crate::vessels::VesselService;
use std::sync::Arc;
use tracing::{info, warn};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Immutable startup configuration.
    pub config: Arc<Config>,
    /// Vessel access and aggregation.
    pub vessels: VesselService,
    /// User lookup.
    pub users: Arc<dyn UserRepository>,
    /// Token and password handling.
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Creates application state backed by the in-memory store.
    #[must_use]
    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::from_parts(config, VesselService::new(store.clone()), store)
    }

    /// Creates application state backed by PostgreSQL.
    #[must_use]
    pub fn with_database(config: Config, db: DatabasePool) -> Self {
        let store = Arc::new(PgStore::new(db));
        Self::from_parts(config, VesselService::new(store.clone()), store)
    }

    /// Creates application state from configuration, connecting to the
    /// database and running migrations when a URL is configured.
    ///
    /// # Errors
    /// Returns error if the database is unreachable or migrations fail.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        match config.database.url.clone() {
            Some(url) => {
                let db = DatabasePool::new(&url, config.database.max_connections).await?;
                db.run_migrations().await?;
                Ok(Self::with_database(config, db))
            }
            None => {
                warn!("No database configured, using in-memory store");
                Ok(Self::in_memory(config))
            }
        }
    }

    fn from_parts(config: Config, vessels: VesselService, users: Arc<dyn UserRepository>) -> Self {
        let auth = Arc::new(AuthService::new(&config.auth));
        info!(
            access_token_minutes = config.auth.access_token_minutes,
            refresh_token_days = config.auth.refresh_token_days,
            "Authentication configured"
        );

        Self {
            config: Arc::new(config),
            vessels,
            users,
            auth,
        }
    }

    /// Returns true when running without a database.
    #[must_use]
    pub fn is_ephemeral(&self) -> bool {
        self.config.database.url.is_none()
    }
}
