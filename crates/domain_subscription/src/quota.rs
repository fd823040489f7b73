//! Plan quota enforcement
//!
//! Authorizes or rejects quota-consuming creates against the account's
//! captured plan limits and live resource counts. Denials are structured
//! values the caller branches on to render a precise upgrade prompt; they
//! are not errors.
//!
//! The check here is pure over a snapshot. The storage layer must run
//! check-then-increment as a single serializable transaction (see
//! [`crate::ports::ResourceCounterStore`]) so two concurrent creates cannot
//! both observe a stale count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::status::{effective_status, SubscriptionDisplayStatus};
use crate::subscription::AccountSubscription;

/// Kinds of quota-limited resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Staff user seats
    Users,
    /// Registered animals
    Animals,
    /// Client (owner) records
    Clients,
    /// Stored documents and images, in whole GB
    StorageGb,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Users => "users",
            ResourceKind::Animals => "animals",
            ResourceKind::Clients => "clients",
            ResourceKind::StorageGb => "storage_gb",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Live per-account resource counts
///
/// Owned and maintained by the CRUD layer; this core only reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCounters {
    pub users: u64,
    pub animals: u64,
    pub clients: u64,
    pub storage_gb: u64,
}

impl ResourceCounters {
    /// All counters at zero
    pub fn zero() -> Self {
        Self::default()
    }

    /// Returns the live count for a resource kind
    pub fn count_for(&self, kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::Users => self.users,
            ResourceKind::Animals => self.animals,
            ResourceKind::Clients => self.clients,
            ResourceKind::StorageGb => self.storage_gb,
        }
    }
}

/// Structured reason a create was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum QuotaDenial {
    /// The plan limit for this resource kind is exhausted
    QuotaExceeded {
        kind: ResourceKind,
        limit: u64,
        current: u64,
    },
    /// The subscription's effective status denies all creates
    SubscriptionInactive {
        status: SubscriptionDisplayStatus,
    },
}

impl fmt::Display for QuotaDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuotaDenial::QuotaExceeded {
                kind,
                limit,
                current,
            } => write!(f, "quota exceeded for {kind}: {current} of {limit} used"),
            QuotaDenial::SubscriptionInactive { status } => {
                write!(f, "subscription is {status}")
            }
        }
    }
}

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotaDecision {
    Authorized,
    Denied(QuotaDenial),
}

impl QuotaDecision {
    pub fn is_authorized(&self) -> bool {
        matches!(self, QuotaDecision::Authorized)
    }

    /// Returns the denial, if any
    pub fn denial(&self) -> Option<&QuotaDenial> {
        match self {
            QuotaDecision::Authorized => None,
            QuotaDecision::Denied(denial) => Some(denial),
        }
    }
}

/// Authorizes quota-consuming creates
pub struct QuotaEnforcer;

impl QuotaEnforcer {
    /// Decides whether `delta` new resources of `kind` may be created
    ///
    /// An inactive effective status denies regardless of counts; an
    /// unbounded plan limit authorizes regardless of counts. Pure over the
    /// given snapshot of subscription and counters.
    pub fn authorize(
        subscription: &AccountSubscription,
        counters: &ResourceCounters,
        kind: ResourceKind,
        delta: u64,
        now: DateTime<Utc>,
    ) -> QuotaDecision {
        let status = effective_status(subscription, now);
        if status.blocks_creates() {
            return QuotaDecision::Denied(QuotaDenial::SubscriptionInactive { status });
        }

        match subscription.limits.limit_for(kind) {
            None => QuotaDecision::Authorized,
            Some(limit) => {
                let current = counters.count_for(kind);
                if current.saturating_add(delta) > limit {
                    QuotaDecision::Denied(QuotaDenial::QuotaExceeded {
                        kind,
                        limit,
                        current,
                    })
                } else {
                    QuotaDecision::Authorized
                }
            }
        }
    }
}
