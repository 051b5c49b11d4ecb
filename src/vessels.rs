//! Vessel rate access and aggregation.

use crate::db::{
    DailyTotals, DateRange, NewVesselData, StoreError, VesselData, VesselFilter, VesselRepository,
};
use std::sync::Arc;
use tracing::{debug, info};

/// List/create/aggregate operations over the vessel record store.
#[derive(Clone)]
pub struct VesselService {
    repo: Arc<dyn VesselRepository>,
}

impl VesselService {
    /// Wraps a repository.
    #[must_use]
    pub fn new(repo: Arc<dyn VesselRepository>) -> Self {
        Self { repo }
    }

    /// Observations matching `filter`, ascending by date.
    ///
    /// # Errors
    /// Returns error if the store query fails.
    pub async fn list(&self, filter: &VesselFilter) -> Result<Vec<VesselData>, StoreError> {
        let total = self.repo.count().await?;
        debug!(total, "vessel records in store");

        let rows = self.repo.list(filter).await?;
        info!(
            count = rows.len(),
            vessel = ?filter.vessel,
            start = ?filter.range.start,
            end = ?filter.range.end,
            "returning vessel records"
        );
        if let Some(sample) = rows.first() {
            debug!(?sample, "sample record");
        }
        Ok(rows)
    }

    /// Appends one observation. Existing rows are never touched.
    ///
    /// # Errors
    /// Returns error if the insert fails.
    pub async fn create(&self, record: NewVesselData) -> Result<VesselData, StoreError> {
        let stored = self.repo.insert(record).await?;
        info!(id = stored.id, vessel = %stored.vessel_name, date = %stored.date, "vessel record added");
        Ok(stored)
    }

    /// Per-date totals across all vessels within `range`.
    ///
    /// # Errors
    /// Returns error if the store query fails.
    pub async fn aggregate_by_date(
        &self,
        range: &DateRange,
    ) -> Result<Vec<DailyTotals>, StoreError> {
        let totals = self.repo.aggregate_by_date(range).await?;
        debug!(buckets = totals.len(), "aggregated vessel records");
        Ok(totals)
    }

    /// Total number of stored observations.
    ///
    /// # Errors
    /// Returns error if the store query fails.
    pub async fn count(&self) -> Result<i64, StoreError> {
        self.repo.count().await
    }

    /// Replaces every observation with `records`.
    ///
    /// # Errors
    /// Returns error if the store update fails.
    pub async fn replace_all(&self, records: Vec<NewVesselData>) -> Result<usize, StoreError> {
        self.repo.replace_all(records).await
    }
}
