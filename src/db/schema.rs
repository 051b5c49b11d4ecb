//! Database row types and query filters.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Maximum length of a vessel name.
pub const VESSEL_NAME_MAX_LEN: usize = 100;

/// One vessel rate observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct VesselData {
    /// Store-assigned identifier.
    pub id: i64,
    /// Vessel name.
    pub vessel_name: String,
    /// Observation date.
    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub date: NaiveDate,
    /// Contracted hire rate.
    pub hire_rate: i32,
    /// Prevailing market rate.
    pub market_rate: i32,
}

/// A validated observation that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVesselData {
    /// Vessel name, 1 to 100 characters.
    pub vessel_name: String,
    /// Observation date.
    pub date: NaiveDate,
    /// Contracted hire rate.
    pub hire_rate: i32,
    /// Prevailing market rate.
    pub market_rate: i32,
}

/// Per-date totals across all vessels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DailyTotals {
    /// Bucket date.
    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub date: NaiveDate,
    /// Sum of hire rates on this date.
    pub total_hire: i64,
    /// Sum of market rates on this date.
    pub total_market: i64,
}

/// Inclusive date bounds. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    /// Earliest date included.
    pub start: Option<NaiveDate>,
    /// Latest date included.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Returns true if `date` falls within the bounds.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Filter for listing observations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VesselFilter {
    /// Exact vessel name match.
    pub vessel: Option<String>,
    /// Date bounds.
    pub range: DateRange,
}

impl VesselFilter {
    /// Returns true if the record passes the filter.
    #[must_use]
    pub fn matches(&self, record: &VesselData) -> bool {
        self.vessel
            .as_deref()
            .is_none_or(|vessel| record.vessel_name == vessel)
            && self.range.contains(record.date)
    }
}

/// Application user.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Unique identifier.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    /// May write data and view aggregates.
    pub is_staff: bool,
    /// Superuser flag.
    pub is_superuser: bool,
    /// Inactive users cannot log in.
    pub is_active: bool,
    /// Account creation timestamp.
    pub date_joined: DateTime<Utc>,
}

/// A user that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    /// Staff flag.
    pub is_staff: bool,
    /// Superuser flag.
    pub is_superuser: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_date_range_inclusive_bounds() {
        let range = DateRange {
            start: Some(date("2024-01-02")),
            end: Some(date("2024-01-04")),
        };
        assert!(!range.contains(date("2024-01-01")));
        assert!(range.contains(date("2024-01-02")));
        assert!(range.contains(date("2024-01-04")));
        assert!(!range.contains(date("2024-01-05")));
    }

    #[test]
    fn test_open_range_contains_everything() {
        assert!(DateRange::default().contains(date("1970-01-01")));
    }

    #[test]
    fn test_vessel_filter_exact_match() {
        let record = VesselData {
            id: 1,
            vessel_name: "Poseidon".to_string(),
            date: date("2024-01-01"),
            hire_rate: 100,
            market_rate: 90,
        };
        let exact = VesselFilter {
            vessel: Some("Poseidon".to_string()),
            ..Default::default()
        };
        let prefix = VesselFilter {
            vessel: Some("Pos".to_string()),
            ..Default::default()
        };
        assert!(exact.matches(&record));
        assert!(!prefix.matches(&record));
    }

    #[test]
    fn test_daily_totals_serialization() {
        let totals = DailyTotals {
            date: date("2024-01-01"),
            total_hire: 300,
            total_market: 300,
        };
        let json = serde_json::to_string(&totals).unwrap();
        assert_eq!(
            json,
            r#"{"date":"2024-01-01","total_hire":300,"total_market":300}"#
        );
    }
}
