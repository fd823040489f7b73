//! Subscription Domain - Plans, Quotas, and the Subscription State Machine
//!
//! This crate owns the subscription side of the billing core:
//!
//! - an immutable plan catalog (new pricing = new plan id)
//! - the per-tenant subscription aggregate and its externally-triggered
//!   state machine (`trialing / active / past_due / canceled / incomplete`)
//! - quota enforcement for creates against captured plan limits
//! - pure derived display status, so read paths show `trial_expired` and
//!   period-end cancellations without any background sweep
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_subscription::{AccountSubscription, QuotaEnforcer, ResourceKind};
//!
//! let mut sub = AccountSubscription::start_trial(account_id, &plan, cycle, now)?;
//! sub.transition(SubscriptionEvent::ChargeSucceeded, now)?;
//!
//! let decision = QuotaEnforcer::authorize(&sub, &counters, ResourceKind::Animals, 1, now);
//! ```

pub mod catalog;
pub mod error;
pub mod plan;
pub mod ports;
pub mod quota;
pub mod status;
pub mod subscription;

pub use catalog::PlanCatalog;
pub use error::SubscriptionError;
pub use plan::{Capability, Plan, PlanLimits};
pub use ports::{ResourceCounterStore, SubscriptionStore};
pub use quota::{QuotaDecision, QuotaDenial, QuotaEnforcer, ResourceCounters, ResourceKind};
pub use status::{effective_status, SubscriptionDisplayStatus};
pub use subscription::{AccountSubscription, SubscriptionEvent, SubscriptionStatus};
