//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the relevant fields and take defaults for the rest.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{AccountId, BillingCycle, ClientId, Currency, Money};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_invoicing::invoice::{Invoice, InvoiceItem};
use domain_subscription::plan::Plan;
use domain_subscription::subscription::{AccountSubscription, SubscriptionEvent};

use crate::fixtures::{PlanFixtures, StringFixtures, TemporalFixtures};

/// Builder for test subscriptions
pub struct TestSubscriptionBuilder {
    account_id: AccountId,
    plan: Plan,
    cycle: BillingCycle,
    started_at: DateTime<Utc>,
    activated: bool,
}

impl Default for TestSubscriptionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSubscriptionBuilder {
    /// Creates a builder for a Basic monthly trial started at the fixture "now"
    pub fn new() -> Self {
        Self {
            account_id: AccountId::new(),
            plan: PlanFixtures::basic(),
            cycle: BillingCycle::Monthly,
            started_at: TemporalFixtures::now(),
            activated: false,
        }
    }

    /// Sets the account ID
    pub fn with_account_id(mut self, id: AccountId) -> Self {
        self.account_id = id;
        self
    }

    /// Sets the plan
    pub fn with_plan(mut self, plan: Plan) -> Self {
        self.plan = plan;
        self
    }

    /// Sets the billing cycle
    pub fn with_cycle(mut self, cycle: BillingCycle) -> Self {
        self.cycle = cycle;
        self
    }

    /// Sets the trial start timestamp
    pub fn started_at(mut self, at: DateTime<Utc>) -> Self {
        self.started_at = at;
        self
    }

    /// Converts the trial into an active subscription via a successful charge
    pub fn activated(mut self) -> Self {
        self.activated = true;
        self
    }

    /// Builds the subscription
    pub fn build(self) -> AccountSubscription {
        let mut sub = AccountSubscription::start_trial(
            self.account_id,
            &self.plan,
            self.cycle,
            self.started_at,
        )
        .expect("builder produced an invalid trial");
        if self.activated {
            sub.transition(SubscriptionEvent::ChargeSucceeded, self.started_at)
                .expect("trial to active always succeeds");
        }
        sub
    }
}

/// Builder for test invoices
pub struct TestInvoiceBuilder {
    account_id: AccountId,
    client_id: ClientId,
    currency: Currency,
    due_date: NaiveDate,
    created_at: DateTime<Utc>,
    items: Vec<(String, Decimal, i64, Decimal)>,
    tax_minor: i64,
    finalized: bool,
}

impl Default for TestInvoiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestInvoiceBuilder {
    /// Creates a builder for an empty BRL draft due at the fixture due date
    pub fn new() -> Self {
        Self {
            account_id: AccountId::new(),
            client_id: ClientId::new(),
            currency: Currency::BRL,
            due_date: TemporalFixtures::due_date(),
            created_at: TemporalFixtures::now(),
            items: Vec::new(),
            tax_minor: 0,
            finalized: false,
        }
    }

    /// Sets the issuing account
    pub fn with_account_id(mut self, id: AccountId) -> Self {
        self.account_id = id;
        self
    }

    /// Sets the billed client
    pub fn with_client_id(mut self, id: ClientId) -> Self {
        self.client_id = id;
        self
    }

    /// Sets the due date
    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = due;
        self
    }

    /// Adds a line item at quantity 1 with no discount
    pub fn with_item(self, description: impl Into<String>, unit_price_minor: i64) -> Self {
        self.with_item_full(description, dec!(1), unit_price_minor, Decimal::ZERO)
    }

    /// Adds a line item with quantity and discount
    pub fn with_item_full(
        mut self,
        description: impl Into<String>,
        quantity: Decimal,
        unit_price_minor: i64,
        discount_percent: Decimal,
    ) -> Self {
        self.items
            .push((description.into(), quantity, unit_price_minor, discount_percent));
        self
    }

    /// Sets the tax amount in minor units
    pub fn with_tax(mut self, tax_minor: i64) -> Self {
        self.tax_minor = tax_minor;
        self
    }

    /// Finalizes the invoice after building (adds a default item if empty)
    pub fn finalized(mut self) -> Self {
        self.finalized = true;
        self
    }

    /// Builds the invoice
    pub fn build(self) -> Invoice {
        let mut invoice = Invoice::new(
            self.account_id,
            self.client_id,
            self.currency,
            self.due_date,
            self.created_at,
        );

        let mut items = self.items;
        if self.finalized && items.is_empty() {
            items.push((
                StringFixtures::item_description().to_string(),
                dec!(1),
                9500,
                Decimal::ZERO,
            ));
        }

        for (description, quantity, unit_price_minor, discount) in items {
            let item = InvoiceItem::new(
                description,
                quantity,
                Money::from_minor(unit_price_minor, self.currency),
            )
            .and_then(|i| i.with_discount(discount))
            .expect("builder produced an invalid item");
            invoice
                .add_item(item, self.created_at)
                .expect("adding to a draft never fails");
        }

        if self.tax_minor > 0 {
            invoice
                .set_tax(Money::from_minor(self.tax_minor, self.currency), self.created_at)
                .expect("setting tax on a draft never fails");
        }

        if self.finalized {
            invoice
                .finalize(self.created_at)
                .expect("finalizing a non-empty draft never fails");
        }

        invoice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_invoicing::invoice::InvoiceStatus;
    use domain_subscription::subscription::SubscriptionStatus;

    #[test]
    fn test_subscription_builder_defaults_to_trial() {
        let sub = TestSubscriptionBuilder::new().build();
        assert_eq!(sub.status, SubscriptionStatus::Trialing);
        assert!(sub.trial_ends_at.is_some());
    }

    #[test]
    fn test_subscription_builder_activated() {
        let sub = TestSubscriptionBuilder::new().activated().build();
        assert_eq!(sub.status, SubscriptionStatus::Active);
    }

    #[test]
    fn test_invoice_builder_computes_total() {
        let invoice = TestInvoiceBuilder::new()
            .with_item_full("Consultation", dec!(2), 5000, dec!(10))
            .with_tax(500)
            .finalized()
            .build();

        assert_eq!(invoice.status, InvoiceStatus::Sent);
        assert_eq!(
            invoice.total_amount().unwrap(),
            Money::from_minor(9500, Currency::BRL)
        );
    }
}
