//! # Temporal Types — UTC Timestamps and Clocks
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to seconds precision,
//! and the [`Clock`] trait through which the ledger reads the current time.
//!
//! ## Invariant
//!
//! Unlock times are compared at second granularity. A receipt created at
//! `t` with a cooldown of `d` seconds unlocks strictly after `t + d`; keeping
//! sub-second components would make that comparison depend on when within a
//! second the deposit happened.
//!
//! Non-UTC string inputs are **rejected at construction**. There is no silent
//! offset conversion.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ArithmeticError;

/// Rejected timestamp input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// The epoch value is outside chrono's representable range.
    #[error("invalid unix timestamp: {0}")]
    InvalidEpoch(i64),

    /// The string is not an RFC 3339 timestamp with a `Z` suffix.
    #[error("invalid timestamp {input:?}: {reason}")]
    InvalidFormat {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`]: current UTC time, truncated.
/// - [`Timestamp::from_utc()`]: from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::from_epoch_secs()`]: from Unix seconds.
/// - [`Timestamp::parse()`]: from an RFC 3339 string, rejecting non-UTC offsets.
///
/// Deserialization goes through [`Timestamp::parse()`] as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
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

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, TimestampError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or(TimestampError::InvalidEpoch(secs))
    }

    /// Parse a timestamp from an RFC 3339 string.
    ///
    /// Only the `Z` suffix is accepted; explicit offsets, including `+00:00`,
    /// are rejected.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        if !s.ends_with('Z') {
            return Err(TimestampError::InvalidFormat {
                input: s.to_string(),
                reason: "must use Z suffix (UTC only)".to_string(),
            });
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| TimestampError::InvalidFormat {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// This timestamp shifted forward by `secs` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::Overflow`] if the result is not
    /// representable.
    pub fn checked_add_secs(&self, secs: u64) -> Result<Self, ArithmeticError> {
        let overflow = || ArithmeticError::overflow("unlock_at");
        let secs = i64::try_from(secs).map_err(|_| overflow())?;
        let delta = TimeDelta::try_seconds(secs).ok_or_else(overflow)?;
        self.0
            .checked_add_signed(delta)
            .map(Self)
            .ok_or_else(overflow)
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
    type Error = TimestampError;

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

// ─── Clocks ──────────────────────────────────────────────────────────

/// Source of the current time for ledger operations.
///
/// The ledger reads the clock once per public operation, so every step of
/// one operation (including the sweep a deposit triggers) observes the same
/// instant.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
///
/// Cloning shares the underlying instant, so a test can hold one handle and
/// hand another to the ledger.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Create a clock frozen at the given Unix second.
    pub fn at_epoch_secs(secs: i64) -> Result<Self, TimestampError> {
        Timestamp::from_epoch_secs(secs).map(Self::new)
    }

    /// Move the clock to `to`. Moving backwards is allowed.
    pub fn set(&self, to: Timestamp) {
        *self.now.lock() = to;
    }

    /// Move the clock forward by `secs` seconds.
    pub fn advance_secs(&self, secs: u64) -> Result<Timestamp, ArithmeticError> {
        let mut guard = self.now.lock();
        let next = guard.checked_add_secs(secs)?;
        *guard = next;
        Ok(next)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}
