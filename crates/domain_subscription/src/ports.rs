//! Storage ports for the subscription domain
//!
//! The domain functions are pure over a snapshot; adapters own persistence
//! and the isolation each operation needs.

use async_trait::async_trait;

use core_kernel::{AccountId, DomainPort, PortError};

use crate::quota::{ResourceCounters, ResourceKind};
use crate::subscription::AccountSubscription;

/// Persistence for account subscriptions
#[async_trait]
pub trait SubscriptionStore: DomainPort {
    /// Loads the current subscription for an account
    async fn load(&self, account_id: AccountId) -> Result<AccountSubscription, PortError>;

    /// Persists a subscription after a transition or plan change
    ///
    /// Must reject a write based on a stale snapshot with
    /// [`PortError::Conflict`] (optimistic concurrency), since two gateway
    /// webhooks for the same account can race.
    async fn save(&self, subscription: &AccountSubscription) -> Result<(), PortError>;
}

/// Persistence for live resource counters
#[async_trait]
pub trait ResourceCounterStore: DomainPort {
    /// Returns the current counters for an account
    async fn counters(&self, account_id: AccountId) -> Result<ResourceCounters, PortError>;

    /// Increments a counter after an authorized create
    ///
    /// The quota check and this increment must execute as a single
    /// serializable transaction (or an optimistic retry loop surfacing
    /// [`PortError::Conflict`]); two concurrent creates must not both
    /// observe the same pre-increment count.
    async fn increment(
        &self,
        account_id: AccountId,
        kind: ResourceKind,
        delta: u64,
    ) -> Result<(), PortError>;

    /// Decrements a counter after a delete
    async fn decrement(
        &self,
        account_id: AccountId,
        kind: ResourceKind,
        delta: u64,
    ) -> Result<(), PortError>;
}
