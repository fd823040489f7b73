//! Core Kernel - Foundational types for the veterinary billing core
//!
//! This crate provides the fundamental building blocks used across all
//! domain modules:
//! - Money as exact minor-unit arithmetic with currency safety
//! - Billing-period and trial-window temporal types
//! - Strongly-typed identifiers and the storage-port contract

pub mod identifiers;
pub mod money;
pub mod ports;
pub mod temporal;

pub use identifiers::{
    AccountId, AnimalId, ClientId, InvoiceId, InvoiceItemId, PaymentId, PlanId, SubscriptionId,
    UserId,
};
pub use money::{Currency, Money, MoneyError, Rate, Ratio};
pub use ports::{DomainPort, PortError};
pub use temporal::{default_trial_end, BillingCycle, BillingPeriod, TemporalError, TRIAL_PERIOD_DAYS};
