//! Property-Based Test Generators
//!
//! Proptest strategies for generating random test data that maintains
//! domain invariants.

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::{AccountId, ClientId, Currency, Money};
use fake::faker::name::en::Name;
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_invoicing::payment::PaymentMethod;
use domain_subscription::quota::ResourceKind;

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::BRL),
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::JPY),
    ]
}

/// Strategy for positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for positive Money values
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    (positive_amount_minor_strategy(), currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for positive BRL Money values
pub fn brl_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy().prop_map(|amount| Money::from_minor(amount, Currency::BRL))
}

/// Strategy for discount percentages (0% to 100%)
pub fn discount_percent_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..=10000u32).prop_map(|n| Decimal::new(n as i64, 2))
}

/// Strategy for line quantities (0.01 to 100.00)
pub fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for timestamps within 2024
pub fn timestamp_2024_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..365i64).prop_map(|days| {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(days)
    })
}

/// Strategy for resource kinds
pub fn resource_kind_strategy() -> impl Strategy<Value = ResourceKind> {
    prop_oneof![
        Just(ResourceKind::Users),
        Just(ResourceKind::Animals),
        Just(ResourceKind::Clients),
        Just(ResourceKind::StorageGb),
    ]
}

/// Strategy for payment methods
pub fn payment_method_strategy() -> impl Strategy<Value = PaymentMethod> {
    prop_oneof![
        Just(PaymentMethod::Cash),
        Just(PaymentMethod::CreditCard),
        Just(PaymentMethod::DebitCard),
        Just(PaymentMethod::Pix),
        Just(PaymentMethod::BankTransfer),
    ]
}

/// Strategy for AccountId
pub fn account_id_strategy() -> impl Strategy<Value = AccountId> {
    any::<[u8; 16]>().prop_map(|bytes| AccountId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for ClientId
pub fn client_id_strategy() -> impl Strategy<Value = ClientId> {
    any::<[u8; 16]>().prop_map(|bytes| ClientId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// A random pet-owner name for realistic test records
pub fn fake_client_name() -> String {
    Name().fake()
}
