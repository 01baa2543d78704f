//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, the creation time carried on every organization
//! record. The backend emits RFC 3339 strings with arbitrary offsets
//! (`+00:00`, `Z`, and occasionally local offsets); all of them are
//! normalized to UTC with seconds precision on the way in.
//!
//! Serialized form is always `YYYY-MM-DDTHH:MM:SSZ`.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RangeopsError;

/// A UTC timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::parse()`]: from an RFC 3339 string with any offset.
/// - [`Timestamp::from_epoch_secs()`]: from Unix seconds.
///
/// Sub-second precision is dropped on the way in, so two records created
/// within the same second carry equal timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parse a timestamp from an RFC 3339 string, converting any offset to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`RangeopsError::InvalidTimestamp`] if the string is not
    /// valid RFC 3339.
    pub fn parse(s: &str) -> Result<Self, RangeopsError> {
        let dt = DateTime::parse_from_rfc3339(s.trim()).map_err(|e| {
            RangeopsError::InvalidTimestamp {
                value: s.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, RangeopsError> {
        let dt = DateTime::from_timestamp(secs, 0).ok_or_else(|| {
            RangeopsError::InvalidTimestamp {
                value: secs.to_string(),
                reason: "out of range".to_string(),
            }
        })?;
        Ok(Self(dt))
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl TryFrom<String> for Timestamp {
    type Error = RangeopsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.to_iso8601()
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
