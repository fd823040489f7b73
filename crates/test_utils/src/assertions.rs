//! Custom Test Assertions
//!
//! Assertion helpers for domain types that give more meaningful error
//! messages than standard assertions.

use core_kernel::{BillingPeriod, Money};

use domain_invoicing::invoice::Invoice;
use domain_subscription::quota::{QuotaDecision, QuotaDenial};

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts that a Money value is positive
pub fn assert_money_positive(money: &Money) {
    assert!(
        money.is_positive(),
        "Expected positive money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts that money values sum to a total
///
/// # Panics
///
/// Panics if any currency differs or the sum doesn't equal the total
pub fn assert_money_sum_equals(parts: &[Money], total: &Money) {
    let sum = parts.iter().fold(Money::zero(total.currency()), |acc, m| {
        acc.checked_add(m).expect("Currency mismatch in sum")
    });

    assert_eq!(
        sum,
        *total,
        "Sum of parts ({}) doesn't equal total ({})",
        sum,
        total
    );
}

/// Asserts that a billing period contains a timestamp
pub fn assert_period_contains(period: &BillingPeriod, timestamp: chrono::DateTime<chrono::Utc>) {
    assert!(
        period.contains(timestamp),
        "Period [{}, {}) does not contain {}",
        period.start,
        period.end,
        timestamp
    );
}

/// Asserts that a quota decision authorized the create
pub fn assert_authorized(decision: &QuotaDecision) {
    assert!(
        decision.is_authorized(),
        "Expected an authorized decision, got denial: {:?}",
        decision.denial()
    );
}

/// Asserts that a quota decision was denied for exceeding a limit
pub fn assert_denied_over_quota(decision: &QuotaDecision) {
    match decision.denial() {
        Some(QuotaDenial::QuotaExceeded { .. }) => {}
        other => panic!("Expected QuotaExceeded denial, got {other:?}"),
    }
}

/// Asserts that an invoice's cached paid amount equals its ledger sum
pub fn assert_ledger_consistent(invoice: &Invoice) {
    let sum = invoice
        .payments
        .iter()
        .fold(Money::zero(invoice.currency), |acc, p| {
            acc.checked_add(&p.amount)
                .expect("Currency mismatch in payment ledger")
        });
    assert_eq!(
        sum, invoice.paid_amount,
        "Payment ledger sums to {} but paid_amount caches {}",
        sum, invoice.paid_amount
    );
}
