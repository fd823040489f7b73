//! Subscription domain errors

use core_kernel::{MoneyError, PlanId, TemporalError};
use thiserror::Error;

use crate::subscription::{SubscriptionEvent, SubscriptionStatus};

/// Errors that can occur in the subscription domain
///
/// Quota denials are deliberately not represented here: a denied create is a
/// business outcome the caller branches on, not a failure. See
/// [`crate::quota::QuotaDecision`].
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// Malformed input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Plan not found in the catalog
    #[error("Plan not found: {0}")]
    PlanNotFound(PlanId),

    /// Plan id already published; catalog entries are immutable
    #[error("Plan already published: {0}")]
    PlanAlreadyPublished(PlanId),

    /// The requested state change is not in the transition table
    #[error("Invalid transition: {event} is not permitted from {from}")]
    InvalidTransition {
        from: SubscriptionStatus,
        event: SubscriptionEvent,
    },

    /// Money error
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// Temporal error
    #[error("Temporal error: {0}")]
    Temporal(#[from] TemporalError),
}

impl SubscriptionError {
    pub fn validation(message: impl Into<String>) -> Self {
        SubscriptionError::Validation(message.into())
    }
}
