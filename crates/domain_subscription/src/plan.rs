//! Subscription plan catalog entries
//!
//! A plan is immutable once published: changing a price or a limit means
//! publishing a new plan id and migrating subscriptions to it, so historical
//! invoices and captured limits are never retroactively altered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use core_kernel::{BillingCycle, Money, PlanId};

use crate::quota::ResourceKind;

/// Capabilities a plan can grant
///
/// A closed enum rather than a string-keyed flag bag, so quota enforcement
/// and UI gating cannot diverge on a typo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Public API access
    ApiAccess,
    /// Fiscal invoice (NFe) emission
    FiscalInvoicing,
    /// WhatsApp appointment and payment reminders
    WhatsappReminders,
    /// Multiple practice locations under one account
    MultiLocation,
    /// Custom report builder
    CustomReports,
    /// Priority support channel
    PrioritySupport,
}

/// Per-resource-kind creation limits attached to a plan
///
/// `None` means unbounded for that resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanLimits {
    pub max_users: Option<u32>,
    pub max_animals: Option<u32>,
    pub max_clients: Option<u32>,
    pub max_storage_gb: Option<u32>,
}

impl PlanLimits {
    /// Limits with every resource unbounded
    pub fn unbounded() -> Self {
        Self {
            max_users: None,
            max_animals: None,
            max_clients: None,
            max_storage_gb: None,
        }
    }

    /// Returns the limit for a resource kind, `None` meaning unbounded
    pub fn limit_for(&self, kind: ResourceKind) -> Option<u64> {
        match kind {
            ResourceKind::Users => self.max_users.map(u64::from),
            ResourceKind::Animals => self.max_animals.map(u64::from),
            ResourceKind::Clients => self.max_clients.map(u64::from),
            ResourceKind::StorageGb => self.max_storage_gb.map(u64::from),
        }
    }
}

/// An immutable subscription plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Unique identifier
    pub id: PlanId,
    /// Display name
    pub name: String,
    /// Price for a monthly cycle
    pub monthly_price: Money,
    /// Price for a yearly cycle
    pub yearly_price: Money,
    /// Resource creation limits
    pub limits: PlanLimits,
    /// Granted capabilities
    pub capabilities: BTreeSet<Capability>,
    /// Position in plan listings
    pub sort_order: i32,
    /// Whether the plan is offered to new subscribers
    pub active: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// Creates a new plan
    pub fn new(
        name: impl Into<String>,
        monthly_price: Money,
        yearly_price: Money,
        limits: PlanLimits,
        sort_order: i32,
    ) -> Self {
        Self {
            id: PlanId::new_v7(),
            name: name.into(),
            monthly_price,
            yearly_price,
            limits,
            capabilities: BTreeSet::new(),
            sort_order,
            active: true,
            created_at: Utc::now(),
        }
    }

    /// Grants a capability
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// Returns true if the plan grants the capability
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Returns the price for the given billing cycle
    pub fn price(&self, cycle: BillingCycle) -> Money {
        match cycle {
            BillingCycle::Monthly => self.monthly_price,
            BillingCycle::Yearly => self.yearly_price,
        }
    }
}
