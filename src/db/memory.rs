//! In-process repositories used when no database is configured.

use crate::db::{
    DailyTotals, DateRange, NewUser, NewVesselData, StoreError, User, UserRepository, VesselData,
    VesselFilter, VesselRepository,
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Tables {
    vessels: Vec<VesselData>,
    users: Vec<User>,
    next_vessel_id: i64,
    next_user_id: i64,
}

/// Vessel and user tables held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Groups records by date and sums both rates, ascending by date.
#[must_use]
pub fn sum_by_date<'a, I>(records: I) -> Vec<DailyTotals>
where
    I: IntoIterator<Item = &'a VesselData>,
{
    let mut buckets: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
    for record in records {
        let entry = buckets.entry(record.date).or_default();
        entry.0 += i64::from(record.hire_rate);
        entry.1 += i64::from(record.market_rate);
    }

    buckets
        .into_iter()
        .map(|(date, (total_hire, total_market))| DailyTotals {
            date,
            total_hire,
            total_market,
        })
        .collect()
}

fn push_vessel(tables: &mut Tables, record: NewVesselData) -> VesselData {
    tables.next_vessel_id += 1;
    let stored = VesselData {
        id: tables.next_vessel_id,
        vessel_name: record.vessel_name,
        date: record.date,
        hire_rate: record.hire_rate,
        market_rate: record.market_rate,
    };
    tables.vessels.push(stored.clone());
    stored
}

#[async_trait]
impl VesselRepository for MemoryStore {
    async fn list(&self, filter: &VesselFilter) -> Result<Vec<VesselData>, StoreError> {
        let tables = self.tables.read();
        let mut rows: Vec<VesselData> = tables
            .vessels
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        // Stable sort keeps insertion order within a date.
        rows.sort_by_key(|record| record.date);
        Ok(rows)
    }

    async fn insert(&self, record: NewVesselData) -> Result<VesselData, StoreError> {
        let mut tables = self.tables.write();
        Ok(push_vessel(&mut tables, record))
    }

    async fn aggregate_by_date(&self, range: &DateRange) -> Result<Vec<DailyTotals>, StoreError> {
        let tables = self.tables.read();
        Ok(sum_by_date(
            tables.vessels.iter().filter(|record| range.contains(record.date)),
        ))
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.tables.read().vessels.len() as i64)
    }

    async fn replace_all(&self, records: Vec<NewVesselData>) -> Result<usize, StoreError> {
        let mut tables = self.tables.write();
        tables.vessels.clear();
        let inserted = records.len();
        for record in records {
            push_vessel(&mut tables, record);
        }
        Ok(inserted)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write();
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate(user.username));
        }

        tables.next_user_id += 1;
        let stored = User {
            id: tables.next_user_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            is_active: true,
            date_joined: Utc::now(),
        };
        tables.users.push(stored.clone());
        Ok(stored)
    }
}
