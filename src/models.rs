//! Request and response models for the REST API.

use crate::db::{DateRange, NewVesselData, VESSEL_NAME_MAX_LEN, VesselData, VesselFilter};
use crate::error::ApiError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

/// Date format accepted in queries and request bodies.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

// ============================================================================
// Vessel data
// ============================================================================

/// One observation as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VesselRecord {
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

impl From<VesselData> for VesselRecord {
    fn from(data: VesselData) -> Self {
        Self {
            vessel_name: data.vessel_name,
            date: data.date,
            hire_rate: data.hire_rate,
            market_rate: data.market_rate,
        }
    }
}

/// Query parameters for listing observations.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VesselQuery {
    /// Exact vessel name.
    pub vessel: Option<String>,
    /// Earliest date, inclusive (YYYY-MM-DD).
    pub start_date: Option<String>,
    /// Latest date, inclusive (YYYY-MM-DD).
    pub end_date: Option<String>,
}

impl VesselQuery {
    /// Converts the raw query into a store filter. Blank values count as
    /// absent; a non-blank vessel name is matched exactly, whitespace included.
    ///
    /// # Errors
    /// Returns error if a date is malformed.
    pub fn to_filter(&self) -> Result<VesselFilter, ApiError> {
        Ok(VesselFilter {
            vessel: self
                .vessel
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string),
            range: parse_range(self.start_date.as_deref(), self.end_date.as_deref())?,
        })
    }
}

/// Query parameters for the aggregate endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AggregateQuery {
    /// Earliest date, inclusive (YYYY-MM-DD).
    pub start_date: Option<String>,
    /// Latest date, inclusive (YYYY-MM-DD).
    pub end_date: Option<String>,
}

impl AggregateQuery {
    /// Converts the raw query into date bounds.
    ///
    /// # Errors
    /// Returns error if a date is malformed.
    pub fn to_range(&self) -> Result<DateRange, ApiError> {
        parse_range(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

/// Request to add an observation.
///
/// Fields are loosely typed so that rates sent as floats or numeric strings
/// are coerced rather than rejected.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateVesselRequest {
    /// Vessel name.
    pub vessel_name: Option<String>,
    /// Observation date (YYYY-MM-DD).
    pub date: Option<String>,
    /// Hire rate.
    #[schema(value_type = Option<i64>)]
    pub hire_rate: Option<Value>,
    /// Market rate.
    #[schema(value_type = Option<i64>)]
    pub market_rate: Option<Value>,
}

impl CreateVesselRequest {
    /// Validates the request into a record ready to store.
    ///
    /// # Errors
    /// Returns error if a field is missing or malformed.
    pub fn validate(self) -> Result<NewVesselData, ApiError> {
        let missing = || ApiError::InvalidRequest("All fields are required".to_string());

        let vessel_name = non_empty(self.vessel_name.as_deref())
            .ok_or_else(missing)?
            .to_string();
        let date = non_empty(self.date.as_deref()).ok_or_else(missing)?;
        let hire_rate = self.hire_rate.filter(is_present).ok_or_else(missing)?;
        let market_rate = self.market_rate.filter(is_present).ok_or_else(missing)?;

        if vessel_name.chars().count() > VESSEL_NAME_MAX_LEN {
            return Err(ApiError::InvalidRequest(format!(
                "vessel_name must be at most {} characters",
                VESSEL_NAME_MAX_LEN
            )));
        }

        Ok(NewVesselData {
            vessel_name,
            date: parse_date("date", date)?,
            hire_rate: coerce_rate("hire_rate", &hire_rate)?,
            market_rate: coerce_rate("market_rate", &market_rate)?,
        })
    }
}

/// Response for a created observation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateVesselResponse {
    /// Confirmation message.
    pub message: String,
    /// The stored observation.
    pub data: VesselData,
}

// ============================================================================
// Authentication
// ============================================================================

/// Login request.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Username.
    pub username: Option<String>,
    /// Password.
    pub password: Option<String>,
}

/// Role information returned alongside tokens.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    /// Username.
    pub username: String,
    /// Staff flag.
    pub is_staff: bool,
    /// Superuser flag.
    pub is_superuser: bool,
}

/// Login response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenPairResponse {
    /// Access token.
    pub access: String,
    /// Refresh token.
    pub refresh: String,
    /// Authenticated user.
    pub user: UserSummary,
}

/// Request carrying a refresh token.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RefreshRequest {
    /// Refresh token.
    pub refresh: Option<String>,
}

/// Refresh response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    /// New access token.
    pub access: String,
}

// ============================================================================
// Helpers
// ============================================================================

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ApiError::InvalidRequest(format!(
            "{field} must be a date in YYYY-MM-DD format, got '{value}'"
        ))
    })
}

fn parse_range(start: Option<&str>, end: Option<&str>) -> Result<DateRange, ApiError> {
    Ok(DateRange {
        start: non_empty(start)
            .map(|s| parse_date("start_date", s))
            .transpose()?,
        end: non_empty(end).map(|s| parse_date("end_date", s)).transpose()?,
    })
}

/// Coerces a JSON rate into an integer: integers as-is, floats truncated
/// toward zero, numeric strings parsed.
fn coerce_rate(field: &str, value: &Value) -> Result<i32, ApiError> {
    let invalid = || ApiError::InvalidRequest(format!("{field} must be an integer"));

    let wide: i64 = match value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i,
            (None, Some(f)) if f.is_finite() && f.abs() < 1e15 => f.trunc() as i64,
            _ => return Err(invalid()),
        },
        Value::String(s) => s.trim().parse().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    i32::try_from(wide).map_err(|_| invalid())
}
