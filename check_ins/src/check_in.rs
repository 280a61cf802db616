use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A check-in row as stored in the `check_ins` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CheckIn {
    pub id: i64,
    pub description: String,
    pub lat: Option<Decimal>,
    pub lng: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// The writable fields of a check-in, as produced by validation. Create
/// inserts these and Update replaces all four at once.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCheckIn {
    pub description: String,
    pub lat: Option<Decimal>,
    pub lng: Option<Decimal>,
    pub notes: Option<String>,
}
