//! Integration Tests for the Billing Core
//!
//! These tests verify cross-domain workflows and end-to-end scenarios
//! that involve multiple crates working together.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use core_kernel::{AccountId, BillingCycle, ClientId, Currency, Money};
use rust_decimal_macros::dec;

mod signup_to_billing_workflow {
    use super::*;
    use domain_subscription::{
        effective_status, AccountSubscription, PlanCatalog, QuotaEnforcer, ResourceCounters,
        ResourceKind, SubscriptionDisplayStatus, SubscriptionEvent, SubscriptionStatus,
    };
    use test_utils::fixtures::{PlanFixtures, TemporalFixtures};

    /// A new practice signs up, trials, converts, and bills a client
    #[test]
    fn test_signup_trial_convert() {
        let now = TemporalFixtures::now();
        let mut catalog = PlanCatalog::new();
        catalog.publish(PlanFixtures::basic()).unwrap();
        catalog.publish(PlanFixtures::enterprise()).unwrap();

        let plan = &catalog.list_active()[0];
        let mut sub =
            AccountSubscription::start_trial(AccountId::new(), plan, BillingCycle::Monthly, now)
                .unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Trialing);

        // During the trial the account can create freely within limits
        let decision = QuotaEnforcer::authorize(
            &sub,
            &ResourceCounters::zero(),
            ResourceKind::Animals,
            1,
            now,
        );
        assert!(decision.is_authorized());

        // The gateway reports a successful card charge
        sub.transition(SubscriptionEvent::ChargeSucceeded, now).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert!(sub.current_period.contains(now));
    }

    /// An expired trial blocks creates without any stored status change
    #[test]
    fn test_expired_trial_blocks_creates() {
        let now = TemporalFixtures::now();
        let sub = AccountSubscription::start_trial(
            AccountId::new(),
            &PlanFixtures::basic(),
            BillingCycle::Monthly,
            now,
        )
        .unwrap();

        let later = TemporalFixtures::after_trial();
        assert_eq!(
            effective_status(&sub, later),
            SubscriptionDisplayStatus::TrialExpired
        );
        assert_eq!(sub.status, SubscriptionStatus::Trialing);

        let decision = QuotaEnforcer::authorize(
            &sub,
            &ResourceCounters::zero(),
            ResourceKind::Clients,
            1,
            later,
        );
        assert!(!decision.is_authorized());
    }

    /// Upgrading mid-cycle re-captures the plan limits immediately
    #[test]
    fn test_upgrade_lifts_quota() {
        let now = TemporalFixtures::now();
        let mut sub = AccountSubscription::start_trial(
            AccountId::new(),
            &PlanFixtures::basic(),
            BillingCycle::Monthly,
            now,
        )
        .unwrap();
        sub.transition(SubscriptionEvent::ChargeSucceeded, now).unwrap();

        let at_limit = ResourceCounters {
            animals: 500,
            ..ResourceCounters::zero()
        };
        assert!(
            !QuotaEnforcer::authorize(&sub, &at_limit, ResourceKind::Animals, 1, now)
                .is_authorized()
        );

        sub.change_plan(&PlanFixtures::enterprise(), now).unwrap();
        assert!(
            QuotaEnforcer::authorize(&sub, &at_limit, ResourceKind::Animals, 1, now)
                .is_authorized()
        );
    }

    /// Failed renewals walk active -> past_due -> canceled
    #[test]
    fn test_dunning_path() {
        let now = TemporalFixtures::now();
        let mut sub = AccountSubscription::start_trial(
            AccountId::new(),
            &PlanFixtures::basic(),
            BillingCycle::Monthly,
            now,
        )
        .unwrap();
        sub.transition(SubscriptionEvent::ChargeSucceeded, now).unwrap();

        let renewal = now + Duration::days(31);
        sub.transition(SubscriptionEvent::ChargeFailed, renewal).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::PastDue);

        // Creates are blocked while past due
        let decision = QuotaEnforcer::authorize(
            &sub,
            &ResourceCounters::zero(),
            ResourceKind::Animals,
            1,
            renewal,
        );
        assert!(!decision.is_authorized());

        sub.transition(SubscriptionEvent::RetriesExhausted, renewal + Duration::days(7))
            .unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Canceled);
    }
}

mod invoicing_workflow {
    use super::*;
    use domain_invoicing::{
        InvoiceDisplayStatus, InvoiceItem, InvoiceLedger, InvoicingError, PaymentMethod,
    };
    use test_utils::assertions::assert_ledger_consistent;
    use test_utils::fixtures::TemporalFixtures;

    /// Draft, finalize, partially pay, settle
    #[test]
    fn test_invoice_end_to_end() {
        let now = TemporalFixtures::now();
        let mut ledger = InvoiceLedger::new();
        let account = AccountId::new();
        let id = ledger.open_draft(
            account,
            ClientId::new(),
            Currency::BRL,
            TemporalFixtures::due_date(),
            now,
        );

        let item = InvoiceItem::new(
            "Consultation",
            dec!(2),
            Money::from_minor(5000, Currency::BRL),
        )
        .unwrap()
        .with_discount(dec!(10))
        .unwrap();
        ledger.add_item(&id, item, now).unwrap();
        ledger
            .set_tax(&id, Money::from_minor(500, Currency::BRL), now)
            .unwrap();
        ledger.finalize(&id, now).unwrap();

        ledger
            .record_payment(
                &id,
                Money::from_minor(4000, Currency::BRL),
                PaymentMethod::Pix,
                None,
                now,
            )
            .unwrap();
        assert_eq!(
            ledger.display_status(&id, now).unwrap(),
            InvoiceDisplayStatus::Partial
        );

        ledger
            .record_payment(
                &id,
                Money::from_minor(5500, Currency::BRL),
                PaymentMethod::CreditCard,
                None,
                now,
            )
            .unwrap();
        assert_eq!(
            ledger.display_status(&id, now).unwrap(),
            InvoiceDisplayStatus::Paid
        );
        assert_ledger_consistent(ledger.get(&id).unwrap());
    }

    /// An open invoice past its due date reads overdue while a paid one
    /// issued the same day does not
    #[test]
    fn test_overdue_listing() {
        let now = TemporalFixtures::now();
        let due = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let mut ledger = InvoiceLedger::new();
        let account = AccountId::new();

        let open = ledger.open_draft(account, ClientId::new(), Currency::BRL, due, now);
        let settled = ledger.open_draft(account, ClientId::new(), Currency::BRL, due, now);
        for id in [&open, &settled] {
            ledger
                .add_item(
                    id,
                    InvoiceItem::new("Exam", dec!(1), Money::from_minor(10000, Currency::BRL))
                        .unwrap(),
                    now,
                )
                .unwrap();
            ledger.finalize(id, now).unwrap();
        }
        ledger
            .record_payment(
                &settled,
                Money::from_minor(10000, Currency::BRL),
                PaymentMethod::Cash,
                None,
                now,
            )
            .unwrap();

        let later = Utc.with_ymd_and_hms(2024, 5, 11, 8, 0, 0).unwrap();
        let overdue = ledger.list_overdue(&account, later);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, open);
    }

    /// Overpayment is rejected whole and changes nothing
    #[test]
    fn test_overpayment_leaves_state_intact() {
        let now = TemporalFixtures::now();
        let mut ledger = InvoiceLedger::new();
        let id = ledger.open_draft(
            AccountId::new(),
            ClientId::new(),
            Currency::BRL,
            TemporalFixtures::due_date(),
            now,
        );
        ledger
            .add_item(
                &id,
                InvoiceItem::new("Exam", dec!(1), Money::from_minor(9500, Currency::BRL)).unwrap(),
                now,
            )
            .unwrap();
        ledger.finalize(&id, now).unwrap();

        let err = ledger
            .record_payment(
                &id,
                Money::from_minor(9600, Currency::BRL),
                PaymentMethod::Cash,
                None,
                now,
            )
            .unwrap_err();
        assert!(matches!(err, InvoicingError::OverpaymentRejected { .. }));

        let invoice = ledger.get(&id).unwrap();
        assert!(invoice.payments.is_empty());
        assert!(invoice.paid_amount.is_zero());
    }
}

mod storage_port_workflow {
    use super::*;
    use domain_invoicing::ports::InvoiceStore;
    use domain_invoicing::{PaymentMethod, PaymentRecorder};
    use domain_subscription::ports::{ResourceCounterStore, SubscriptionStore};
    use domain_subscription::{QuotaEnforcer, ResourceKind, SubscriptionEvent};
    use test_utils::assertions::assert_ledger_consistent;
    use test_utils::builders::{TestInvoiceBuilder, TestSubscriptionBuilder};
    use test_utils::fixtures::TemporalFixtures;
    use test_utils::memory::{MemoryCounterStore, MemoryInvoiceStore, MemorySubscriptionStore};

    /// The quota check-then-increment flow against the stores
    #[tokio::test]
    async fn test_authorized_create_increments_counter() {
        let now = TemporalFixtures::now();
        let subs = MemorySubscriptionStore::new();
        let counters = MemoryCounterStore::new();

        let sub = TestSubscriptionBuilder::new().activated().build();
        let account = sub.account_id;
        subs.save(&sub).await.unwrap();

        let loaded = subs.load(account).await.unwrap();
        let snapshot = counters.counters(account).await.unwrap();
        let decision =
            QuotaEnforcer::authorize(&loaded, &snapshot, ResourceKind::Animals, 1, now);
        assert!(decision.is_authorized());

        counters.increment(account, ResourceKind::Animals, 1).await.unwrap();
        assert_eq!(counters.counters(account).await.unwrap().animals, 1);
    }

    /// A subscription transition persists through the store
    #[tokio::test]
    async fn test_transition_round_trips_through_store() {
        let now = TemporalFixtures::now();
        let subs = MemorySubscriptionStore::new();

        let sub = TestSubscriptionBuilder::new().build();
        let account = sub.account_id;
        subs.save(&sub).await.unwrap();

        let mut loaded = subs.load(account).await.unwrap();
        loaded.transition(SubscriptionEvent::ChargeSucceeded, now).unwrap();
        subs.save(&loaded).await.unwrap();

        let reloaded = subs.load(account).await.unwrap();
        assert_eq!(reloaded.status, loaded.status);
        assert_eq!(reloaded.current_period, loaded.current_period);
    }

    /// Payments recorded against a stored invoice survive a reload
    #[tokio::test]
    async fn test_payment_persists_with_invoice() {
        let now = TemporalFixtures::now();
        let store = MemoryInvoiceStore::new();

        let mut invoice = TestInvoiceBuilder::new()
            .with_item("Surgery", 150_000)
            .finalized()
            .build();
        let account = invoice.account_id;
        PaymentRecorder::record_payment(
            &mut invoice,
            Money::from_minor(50_000, Currency::BRL),
            PaymentMethod::Pix,
            Some("deposit".into()),
            now,
        )
        .unwrap();
        store.save(&invoice).await.unwrap();

        let payments = store.payments_for_account(account).await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].amount, Money::from_minor(50_000, Currency::BRL));
    }

    /// Two writers saving from stale snapshots: the in-memory adapter keeps
    /// the last write whole and merges nothing. Interleaved writers must go
    /// through the read-append-recompute transaction documented on
    /// `InvoiceStore::save`.
    #[tokio::test]
    async fn test_stale_snapshot_save_is_last_write_wins() {
        let now = TemporalFixtures::now();
        let store = MemoryInvoiceStore::new();

        let invoice = TestInvoiceBuilder::new()
            .with_item("Surgery", 150_000)
            .finalized()
            .build();
        let id = invoice.id;
        store.save(&invoice).await.unwrap();

        let mut first = store.load(id).await.unwrap();
        let mut second = store.load(id).await.unwrap();

        PaymentRecorder::record_payment(
            &mut first,
            Money::from_minor(50_000, Currency::BRL),
            PaymentMethod::Pix,
            None,
            now,
        )
        .unwrap();
        store.save(&first).await.unwrap();

        PaymentRecorder::record_payment(
            &mut second,
            Money::from_minor(30_000, Currency::BRL),
            PaymentMethod::Cash,
            None,
            now,
        )
        .unwrap();
        store.save(&second).await.unwrap();

        // The first writer's payment is gone: the stale snapshot replaced
        // the row wholesale. The stored invoice is still internally
        // consistent, which is all the adapter promises.
        let stored = store.load(id).await.unwrap();
        assert_eq!(stored.payments.len(), 1);
        assert_eq!(stored.paid_amount, Money::from_minor(30_000, Currency::BRL));
        assert_ledger_consistent(&stored);
    }
}
