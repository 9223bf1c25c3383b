//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to seconds precision.
//! Session expiry, throttle windows, and lock cooldowns are all computed in
//! this type; local timezone offsets never enter the engine.
//!
//! ## Security Invariant
//!
//! Expiry comparisons must be unambiguous. A session record written with a
//! local-offset timestamp could appear live or expired depending on the
//! reader's zone. Non-UTC inputs are rejected at construction — there is no
//! silent conversion on the strict path.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WardenError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`] — from an RFC 3339 string, rejecting non-UTC offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 string.
    ///
    /// **Rejects non-UTC inputs.** Only the `Z` suffix is accepted; explicit
    /// offsets are rejected even when semantically equivalent (`+00:00`).
    ///
    /// # Errors
    ///
    /// Returns [`WardenError::Validation`] if the string is not valid RFC 3339
    /// or uses a non-Z offset.
    pub fn parse(s: &str) -> Result<Self, WardenError> {
        if !s.ends_with('Z') {
            return Err(WardenError::Validation(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            WardenError::Validation(format!("invalid RFC 3339 timestamp {s:?}: {e}"))
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, WardenError> {
        let dt = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| WardenError::Validation(format!("invalid Unix timestamp: {secs}")))?;
        Ok(Self(dt))
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// This timestamp advanced by `secs` seconds.
    ///
    /// Saturates at the chrono representable range rather than wrapping, so
    /// an absurd TTL cannot produce an expiry in the past.
    pub fn plus_secs(&self, secs: u64) -> Self {
        let delta = Duration::seconds(secs.min(i64::MAX as u64) as i64);
        Self(self.0.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC))
    }

    /// Whether this timestamp is strictly before `other`.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Whole seconds from `self` until `other`; zero if `other` is not later.
    pub fn secs_until(&self, other: &Timestamp) -> u64 {
        (other.0 - self.0).num_seconds().max(0) as u64
    }

    /// Render as RFC 3339 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_rfc3339z(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339z())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
