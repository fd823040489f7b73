//! Derived subscription display status
//!
//! Pure compute-on-read functions: stored state plus a caller-supplied
//! `now`. A trialing subscription whose window has elapsed shows as
//! `trial_expired` before any gateway event lands, and a deferred cancel
//! shows as `canceled` once the period has ended. Stored status is only ever
//! mutated by [`crate::subscription::AccountSubscription::transition`], so
//! every real change stays attributable to a concrete event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::subscription::{AccountSubscription, SubscriptionStatus};

/// Display status computed from stored state plus current time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionDisplayStatus {
    Trialing,
    TrialExpired,
    Active,
    PastDue,
    Canceled,
    Incomplete,
}

impl SubscriptionDisplayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionDisplayStatus::Trialing => "trialing",
            SubscriptionDisplayStatus::TrialExpired => "trial_expired",
            SubscriptionDisplayStatus::Active => "active",
            SubscriptionDisplayStatus::PastDue => "past_due",
            SubscriptionDisplayStatus::Canceled => "canceled",
            SubscriptionDisplayStatus::Incomplete => "incomplete",
        }
    }

    /// Returns true if quota-consuming creates are denied in this state
    ///
    /// Reads remain allowed as a grace measure; only creates are blocked.
    pub fn blocks_creates(&self) -> bool {
        matches!(
            self,
            SubscriptionDisplayStatus::TrialExpired
                | SubscriptionDisplayStatus::PastDue
                | SubscriptionDisplayStatus::Canceled
                | SubscriptionDisplayStatus::Incomplete
        )
    }
}

impl fmt::Display for SubscriptionDisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Computes the effective display status of a subscription at `now`
pub fn effective_status(
    subscription: &AccountSubscription,
    now: DateTime<Utc>,
) -> SubscriptionDisplayStatus {
    match subscription.status {
        SubscriptionStatus::Canceled => SubscriptionDisplayStatus::Canceled,
        SubscriptionStatus::Incomplete => SubscriptionDisplayStatus::Incomplete,
        SubscriptionStatus::Trialing => match subscription.trial_ends_at {
            Some(trial_end) if now > trial_end => SubscriptionDisplayStatus::TrialExpired,
            _ => SubscriptionDisplayStatus::Trialing,
        },
        SubscriptionStatus::Active | SubscriptionStatus::PastDue => {
            if subscription.cancel_at_period_end && subscription.current_period.elapsed_at(now) {
                // The terminal transition is pending a period-end event;
                // read paths must not show the account as still running
                SubscriptionDisplayStatus::Canceled
            } else if subscription.status == SubscriptionStatus::Active {
                SubscriptionDisplayStatus::Active
            } else {
                SubscriptionDisplayStatus::PastDue
            }
        }
    }
}
