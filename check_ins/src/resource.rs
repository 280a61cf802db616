use crate::CheckIn;
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DELETED_MESSAGE: &str = "Check-in deleted successfully.";

/// Wire representation of a check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInResource {
    pub id: i64,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub description: String,
    pub notes: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<&CheckIn> for CheckInResource {
    fn from(check_in: &CheckIn) -> Self {
        Self {
            id: check_in.id,
            lat: check_in.lat.as_ref().and_then(decimal_to_f64),
            lng: check_in.lng.as_ref().and_then(decimal_to_f64),
            description: check_in.description.clone(),
            notes: check_in.notes.clone(),
            created_at: check_in.created_at.as_ref().map(iso8601),
            updated_at: check_in.updated_at.as_ref().map(iso8601),
        }
    }
}

impl From<CheckIn> for CheckInResource {
    fn from(check_in: CheckIn) -> Self {
        Self::from(&check_in)
    }
}

/// Goes through the decimal text so the result is the float nearest to the
/// stored value, e.g. `40.7128000` becomes exactly `40.7128`.
fn decimal_to_f64(value: &Decimal) -> Option<f64> {
    value.to_string().parse().ok()
}

/// ISO-8601 with an explicit offset and second precision, e.g.
/// `2025-01-02T03:04:05+00:00`.
pub fn iso8601(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Envelope for single record responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource<T> {
    pub data: T,
}

impl<T> Resource<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deleted {
    pub message: String,
    pub data: CheckInResource,
}

impl Deleted {
    pub fn new(data: CheckInResource) -> Self {
        Self {
            message: DELETED_MESSAGE.to_string(),
            data,
        }
    }
}
