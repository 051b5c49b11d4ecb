//! Demo data seeding.

use crate::db::{NewVesselData, StoreError};
use crate::vessels::VesselService;
use chrono::{Days, NaiveDate};
use rand::Rng;
use std::ops::RangeInclusive;
use tracing::info;

/// Vessels included in the demo data.
pub const DEMO_VESSELS: [&str; 3] = ["Evergreen", "Poseidon", "ExcelMarine"];

/// Consecutive days generated per vessel, ending today.
pub const SEED_DAYS: u64 = 30;

/// Range the demo hire rate is drawn from.
pub const HIRE_RATE_RANGE: RangeInclusive<i32> = 15_000..=25_000;

/// Range the demo market rate is drawn from.
pub const MARKET_RATE_RANGE: RangeInclusive<i32> = 15_000..=26_000;

/// Builds the demo records: [`SEED_DAYS`] days ending at `today` for each
/// vessel in [`DEMO_VESSELS`], oldest first.
pub fn demo_records<R: Rng>(today: NaiveDate, rng: &mut R) -> Vec<NewVesselData> {
    let mut records = Vec::with_capacity(DEMO_VESSELS.len() * SEED_DAYS as usize);

    for vessel in DEMO_VESSELS {
        for offset in (0..SEED_DAYS).rev() {
            let Some(date) = today.checked_sub_days(Days::new(offset)) else {
                continue;
            };
            records.push(NewVesselData {
                vessel_name: vessel.to_string(),
                date,
                hire_rate: rng.gen_range(HIRE_RATE_RANGE),
                market_rate: rng.gen_range(MARKET_RATE_RANGE),
            });
        }
    }

    records
}

/// Clears all vessel data and inserts fresh demo records.
///
/// # Errors
/// Returns error if the store update fails.
pub async fn seed_vessels<R: Rng>(
    vessels: &VesselService,
    today: NaiveDate,
    rng: &mut R,
) -> Result<usize, StoreError> {
    let records = demo_records(today, rng);
    let inserted = vessels.replace_all(records).await?;
    info!(
        inserted,
        vessels = DEMO_VESSELS.len(),
        "Seeded vessel_data with demo data"
    );
    Ok(inserted)
}
