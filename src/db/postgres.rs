//! PostgreSQL-backed repositories.

use crate::db::{
    DailyTotals, DatabasePool, DateRange, NewUser, NewVesselData, StoreError, User,
    UserRepository, VesselData, VesselFilter, VesselRepository,
};
use async_trait::async_trait;

/// Repositories over a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    db: DatabasePool,
}

impl PgStore {
    /// Wraps an established pool.
    #[must_use]
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VesselRepository for PgStore {
    async fn list(&self, filter: &VesselFilter) -> Result<Vec<VesselData>, StoreError> {
        let rows = sqlx::query_as::<_, VesselData>(
            r#"
            SELECT id, vessel_name, date, hire_rate, market_rate
            FROM vessel_data
            WHERE ($1::TEXT IS NULL OR vessel_name = $1)
              AND ($2::DATE IS NULL OR date >= $2)
              AND ($3::DATE IS NULL OR date <= $3)
            ORDER BY date, id
            "#,
        )
        .bind(filter.vessel.as_deref())
        .bind(filter.range.start)
        .bind(filter.range.end)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows)
    }

    async fn insert(&self, record: NewVesselData) -> Result<VesselData, StoreError> {
        let row = sqlx::query_as::<_, VesselData>(
            r#"
            INSERT INTO vessel_data (vessel_name, date, hire_rate, market_rate)
            VALUES ($1, $2, $3, $4)
            RETURNING id, vessel_name, date, hire_rate, market_rate
            "#,
        )
        .bind(&record.vessel_name)
        .bind(record.date)
        .bind(record.hire_rate)
        .bind(record.market_rate)
        .fetch_one(self.db.pool())
        .await?;

        Ok(row)
    }

    async fn aggregate_by_date(&self, range: &DateRange) -> Result<Vec<DailyTotals>, StoreError> {
        let rows = sqlx::query_as::<_, DailyTotals>(
            r#"
            SELECT date,
                   SUM(hire_rate)::BIGINT AS total_hire,
                   SUM(market_rate)::BIGINT AS total_market
            FROM vessel_data
            WHERE ($1::DATE IS NULL OR date >= $1)
              AND ($2::DATE IS NULL OR date <= $2)
            GROUP BY date
            ORDER BY date
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vessel_data")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }

    async fn replace_all(&self, records: Vec<NewVesselData>) -> Result<usize, StoreError> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("DELETE FROM vessel_data")
            .execute(&mut *tx)
            .await?;

        for record in &records {
            sqlx::query(
                r#"
                INSERT INTO vessel_data (vessel_name, date, hire_rate, market_rate)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(&record.vessel_name)
            .bind(record.date)
            .bind(record.hire_rate)
            .bind(record.market_rate)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(records.len())
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, is_staff, is_superuser, is_active, date_joined
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, is_staff, is_superuser, is_active, date_joined
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, is_staff, is_superuser)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, is_staff, is_superuser, is_active, date_joined
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_staff)
        .bind(user.is_superuser)
        .fetch_one(self.db.pool())
        .await;

        match result {
            Ok(created) => Ok(created),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::Duplicate(user.username))
            }
            Err(e) => Err(e.into()),
        }
    }
}
