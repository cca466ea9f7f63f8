//! Database access layer for align-synth
//!
//! Free functions over a `SqlitePool`, one module per table. Identifiers are
//! stored as hyphenated UUID text and timestamps as RFC 3339 UTC text with
//! fixed microsecond precision so that string order is time order.

pub mod groups;
pub mod interviews;
pub mod members;
pub mod profiles;
pub mod settings;
pub mod summaries;

use align_common::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Render a timestamp for storage
pub fn to_db_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp
pub fn parse_db_timestamp(column: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse {}: {}", column, e)))
}

/// Parse a stored identifier
pub fn parse_db_uuid(column: &str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| Error::Internal(format!("Failed to parse {}: {}", column, e)))
}
