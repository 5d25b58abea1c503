//! UTC normalization for store date values.
//!
//! The store serializes dates as either `2025-08-21` (date-only) or
//! `2025-08-21T09:30:00.000Z` / `2025-08-21T09:30:00+02:00`. All recurrence
//! comparisons happen in UTC: a date-only value means midnight UTC, and a
//! datetime without an offset is assumed UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::errors::CoreError;

/// Parse a store date/datetime string into a UTC instant.
///
/// # Errors
///
/// Returns [`CoreError::InvalidDate`] if the value is neither an RFC 3339
/// datetime, an offset-less datetime, nor a plain `YYYY-MM-DD` date.
pub fn parse_utc(raw: &str) -> Result<DateTime<Utc>, CoreError> {
    let value = raw.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Ok(with_offset.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = value.parse::<NaiveDate>() {
        return Ok(midnight_utc(date));
    }

    Err(CoreError::InvalidDate(value.to_string()))
}

/// Midnight UTC of the given calendar date.
#[must_use]
pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}
