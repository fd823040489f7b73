//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for common entities across the billing core.
//! Fixtures are consistent and predictable for unit tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::{
    AccountId, BillingPeriod, ClientId, Currency, InvoiceId, Money, PlanId, SubscriptionId,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use domain_subscription::plan::{Capability, Plan, PlanLimits};

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A standard BRL consultation price (R$95.00)
    pub fn brl_consultation() -> Money {
        Money::from_minor(9500, Currency::BRL)
    }

    /// The Basic plan monthly price (R$99.00)
    pub fn brl_basic_monthly() -> Money {
        Money::from_minor(9900, Currency::BRL)
    }

    /// A zero BRL amount
    pub fn brl_zero() -> Money {
        Money::zero(Currency::BRL)
    }

    /// A USD amount for currency mismatch tests
    pub fn usd_100() -> Money {
        Money::from_minor(10000, Currency::USD)
    }

    /// A JPY amount (zero decimal places)
    pub fn jpy_10000() -> Money {
        Money::from_minor(10000, Currency::JPY)
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard "now" for deterministic tests (May 1, 2024, noon UTC)
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    /// One day after the 14-day trial window expires
    pub fn after_trial() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 16, 12, 0, 0).unwrap()
    }

    /// A timestamp well past any monthly period started at [`Self::now`]
    pub fn next_month() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 2, 12, 0, 0).unwrap()
    }

    /// Standard invoice due date (May 31, 2024)
    pub fn due_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()
    }

    /// A moment the standard due date has already passed
    pub fn past_due_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap()
    }

    /// A one-month billing period starting at [`Self::now`]
    pub fn monthly_period() -> BillingPeriod {
        BillingPeriod::starting_at(Self::now(), core_kernel::BillingCycle::Monthly).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Deterministic account ID for testing
    pub fn account_id() -> AccountId {
        AccountId::from_uuid(Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001))
    }

    /// Deterministic client ID for testing
    pub fn client_id() -> ClientId {
        ClientId::from_uuid(Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0002))
    }

    /// Deterministic plan ID for testing
    pub fn plan_id() -> PlanId {
        PlanId::from_uuid(Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0003))
    }

    /// Deterministic subscription ID for testing
    pub fn subscription_id() -> SubscriptionId {
        SubscriptionId::from_uuid(Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0004))
    }

    /// Deterministic invoice ID for testing
    pub fn invoice_id() -> InvoiceId {
        InvoiceId::from_uuid(Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0005))
    }
}

/// Fixture for plan test data
pub struct PlanFixtures;

impl PlanFixtures {
    /// The Basic plan: 3 users, 500 animals, 300 clients, 5 GB
    pub fn basic() -> Plan {
        Plan::new(
            "Basic",
            Money::from_minor(9900, Currency::BRL),
            Money::from_minor(99900, Currency::BRL),
            PlanLimits {
                max_users: Some(3),
                max_animals: Some(500),
                max_clients: Some(300),
                max_storage_gb: Some(5),
            },
            1,
        )
    }

    /// The Pro plan: roomier limits plus fiscal invoicing
    pub fn pro() -> Plan {
        Plan::new(
            "Pro",
            Money::from_minor(19900, Currency::BRL),
            Money::from_minor(199000, Currency::BRL),
            PlanLimits {
                max_users: Some(10),
                max_animals: Some(5000),
                max_clients: Some(3000),
                max_storage_gb: Some(50),
            },
            2,
        )
        .with_capability(Capability::FiscalInvoicing)
        .with_capability(Capability::WhatsappReminders)
    }

    /// The Enterprise plan: no limits, every capability
    pub fn enterprise() -> Plan {
        Plan::new(
            "Enterprise",
            Money::from_minor(49900, Currency::BRL),
            Money::from_minor(499000, Currency::BRL),
            PlanLimits::unbounded(),
            3,
        )
        .with_capability(Capability::ApiAccess)
        .with_capability(Capability::FiscalInvoicing)
        .with_capability(Capability::WhatsappReminders)
        .with_capability(Capability::MultiLocation)
        .with_capability(Capability::CustomReports)
        .with_capability(Capability::PrioritySupport)
    }
}

/// Fixture for decimal test data
pub struct DecimalFixtures;

impl DecimalFixtures {
    /// Standard per-line discount (10%)
    pub fn standard_discount() -> Decimal {
        dec!(10)
    }

    /// Standard quantity for multi-unit lines
    pub fn quantity_two() -> Decimal {
        dec!(2)
    }

    /// Zero for comparison tests
    pub fn zero() -> Decimal {
        Decimal::ZERO
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    /// Standard clinic name
    pub fn clinic_name() -> &'static str {
        "Clinica Veterinaria Patas Felizes"
    }

    /// Standard line item description
    pub fn item_description() -> &'static str {
        "Consultation"
    }

    /// Standard fiscal number
    pub fn fiscal_number() -> &'static str {
        "NFE-2024-000001"
    }

    /// Test email address
    pub fn email() -> &'static str {
        "maria.silva@example.com"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_fixtures_are_deterministic() {
        assert_eq!(IdFixtures::account_id(), IdFixtures::account_id());
        assert_ne!(
            IdFixtures::account_id().as_uuid(),
            IdFixtures::client_id().as_uuid()
        );
    }

    #[test]
    fn test_temporal_fixtures_ordering() {
        assert!(TemporalFixtures::now() < TemporalFixtures::after_trial());
        assert!(TemporalFixtures::after_trial() < TemporalFixtures::next_month());
    }

    #[test]
    fn test_plan_fixtures_sorted_by_tier() {
        assert!(PlanFixtures::basic().sort_order < PlanFixtures::pro().sort_order);
        assert!(PlanFixtures::pro().sort_order < PlanFixtures::enterprise().sort_order);
    }
}
