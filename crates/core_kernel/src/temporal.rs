//! Billing-period and trial-window time handling
//!
//! All status derivation in the system is compute-on-read: stored state plus
//! a caller-supplied `now`. These types keep that arithmetic in one place so
//! the domains never reach for wall-clock time themselves.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of the signup trial window
pub const TRIAL_PERIOD_DAYS: i64 = 14;

/// Returns the trial end timestamp for a trial starting at `now`
pub fn default_trial_end(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(TRIAL_PERIOD_DAYS)
}

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must be before end {end}")]
    InvalidPeriod { start: String, end: String },

    #[error("Timestamp out of representable range")]
    OutOfRange,
}

/// How often a subscription renews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl BillingCycle {
    /// Advances a timestamp by one cycle
    pub fn advance(&self, from: DateTime<Utc>) -> Result<DateTime<Utc>, TemporalError> {
        let months = match self {
            BillingCycle::Monthly => Months::new(1),
            BillingCycle::Yearly => Months::new(12),
        };
        from.checked_add_months(months)
            .ok_or(TemporalError::OutOfRange)
    }
}

/// A half-open billing period `[start, end)`
///
/// The period anchor drives renewal invoicing and resolves deferred
/// cancellations; it is never advanced by a local timer, only by explicit
/// renewal events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BillingPeriod {
    /// Creates a new billing period
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TemporalError> {
        if start >= end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Creates the period starting at `start` and ending one cycle later
    pub fn starting_at(start: DateTime<Utc>, cycle: BillingCycle) -> Result<Self, TemporalError> {
        let end = cycle.advance(start)?;
        Self::new(start, end)
    }

    /// Returns true if the period contains the given timestamp
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp < self.end
    }

    /// Returns true if the period has fully elapsed at the given timestamp
    pub fn elapsed_at(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.end
    }

    /// Returns the immediately following period of the same anchor
    pub fn next(&self, cycle: BillingCycle) -> Result<Self, TemporalError> {
        let end = cycle.advance(self.end)?;
        Self::new(self.end, end)
    }

    /// Returns the period length in whole days
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}
