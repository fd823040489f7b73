//! Account subscription aggregate and its state machine
//!
//! Every transition is externally triggered, by an explicit user action or a
//! payment-gateway event the caller translates into a [`SubscriptionEvent`].
//! Nothing in this module consults wall-clock time on its own; read paths
//! that need "trial expired" or "canceled at period end" derive it via
//! [`crate::status::effective_status`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use core_kernel::{
    default_trial_end, AccountId, BillingCycle, BillingPeriod, PlanId, SubscriptionId,
};

use crate::error::SubscriptionError;
use crate::plan::{Plan, PlanLimits};

/// Stored subscription status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// In the signup trial window
    Trialing,
    /// Paid and current
    Active,
    /// A renewal charge failed; gateway retries are in flight
    PastDue,
    /// Terminal; re-subscription is a new record
    Canceled,
    /// Created, first charge not yet completed
    Incomplete,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Incomplete => "incomplete",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Externally-triggered subscription events
///
/// Gateway webhooks (`charge.succeeded`, `charge.failed`, ...) and admin
/// actions are translated into these by the caller; the core never talks to
/// the gateway and never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionEvent {
    /// A charge succeeded (first charge or renewal retry)
    ChargeSucceeded,
    /// A renewal charge failed
    ChargeFailed,
    /// The gateway exhausted its retry schedule
    RetriesExhausted,
    /// The trial window closed with no payment method on file
    TrialExpired,
    /// Explicit immediate cancellation
    CancelNow,
    /// Flag the subscription to cancel when the current period ends
    CancelAtPeriodEnd,
    /// The current billing period ended (resolves a deferred cancel)
    PeriodEnded,
}

impl SubscriptionEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionEvent::ChargeSucceeded => "charge_succeeded",
            SubscriptionEvent::ChargeFailed => "charge_failed",
            SubscriptionEvent::RetriesExhausted => "retries_exhausted",
            SubscriptionEvent::TrialExpired => "trial_expired",
            SubscriptionEvent::CancelNow => "cancel_now",
            SubscriptionEvent::CancelAtPeriodEnd => "cancel_at_period_end",
            SubscriptionEvent::PeriodEnded => "period_ended",
        }
    }
}

impl fmt::Display for SubscriptionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tenant account's subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSubscription {
    /// Unique identifier
    pub id: SubscriptionId,
    /// Owning tenant account
    pub account_id: AccountId,
    /// Current plan reference
    pub plan_id: PlanId,
    /// Plan limits captured at assignment time, not by live join, so a
    /// later plan retirement never changes what this account bought
    pub limits: PlanLimits,
    /// Renewal cadence
    pub cycle: BillingCycle,
    /// Stored status
    pub status: SubscriptionStatus,
    /// End of the signup trial window, set iff the subscription started
    /// as a trial
    pub trial_ends_at: Option<DateTime<Utc>>,
    /// Current billing period anchor
    pub current_period: BillingPeriod,
    /// Deferred-cancel flag; the terminal transition happens at period end
    pub cancel_at_period_end: bool,
    /// When the terminal transition happened
    pub canceled_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl AccountSubscription {
    /// Creates a trialing subscription at account signup
    ///
    /// The trial window ends [`core_kernel::TRIAL_PERIOD_DAYS`] days from
    /// `now`, which satisfies the invariant that a trialing subscription
    /// always carries a future trial end at creation.
    pub fn start_trial(
        account_id: AccountId,
        plan: &Plan,
        cycle: BillingCycle,
        now: DateTime<Utc>,
    ) -> Result<Self, SubscriptionError> {
        let trial_end = default_trial_end(now);
        Ok(Self {
            id: SubscriptionId::new_v7(),
            account_id,
            plan_id: plan.id,
            limits: plan.limits,
            cycle,
            status: SubscriptionStatus::Trialing,
            trial_ends_at: Some(trial_end),
            current_period: BillingPeriod::new(now, trial_end)?,
            cancel_at_period_end: false,
            canceled_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Creates a subscription awaiting its first charge (no trial)
    pub fn new_incomplete(
        account_id: AccountId,
        plan: &Plan,
        cycle: BillingCycle,
        now: DateTime<Utc>,
    ) -> Result<Self, SubscriptionError> {
        Ok(Self {
            id: SubscriptionId::new_v7(),
            account_id,
            plan_id: plan.id,
            limits: plan.limits,
            cycle,
            status: SubscriptionStatus::Incomplete,
            trial_ends_at: None,
            current_period: BillingPeriod::starting_at(now, cycle)?,
            cancel_at_period_end: false,
            canceled_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an externally-triggered event
    ///
    /// Any (status, event) pair outside the transition table is rejected
    /// with `InvalidTransition`; the caller owns retry/backoff. `Canceled`
    /// is terminal: no event re-enters it.
    pub fn transition(
        &mut self,
        event: SubscriptionEvent,
        now: DateTime<Utc>,
    ) -> Result<(), SubscriptionError> {
        use SubscriptionEvent::*;
        use SubscriptionStatus::*;

        let from = self.status;
        match (from, event) {
            // First charge converts a trial or an incomplete signup
            (Trialing, ChargeSucceeded) | (Incomplete, ChargeSucceeded) => {
                self.status = Active;
                self.current_period = BillingPeriod::starting_at(now, self.cycle)?;
            }
            // A retried renewal charge recovers a past-due account; a
            // renewal on an active one rolls the period forward
            (Active, ChargeSucceeded) | (PastDue, ChargeSucceeded) => {
                self.status = Active;
                self.current_period = self.current_period.next(self.cycle)?;
            }
            (Active, ChargeFailed) => {
                self.status = PastDue;
            }
            (Trialing, TrialExpired)
            | (Trialing, CancelNow)
            | (Incomplete, CancelNow)
            | (PastDue, CancelNow)
            | (PastDue, RetriesExhausted) => {
                self.status = Canceled;
                self.canceled_at = Some(now);
            }
            (Active, CancelAtPeriodEnd) | (PastDue, CancelAtPeriodEnd) => {
                self.cancel_at_period_end = true;
            }
            (Active, PeriodEnded) | (PastDue, PeriodEnded) if self.cancel_at_period_end => {
                self.status = Canceled;
                self.canceled_at = Some(now);
            }
            _ => {
                return Err(SubscriptionError::InvalidTransition { from, event });
            }
        }

        self.updated_at = now;
        debug!(
            subscription_id = %self.id,
            from = %from,
            to = %self.status,
            event = %event,
            "subscription transition"
        );
        Ok(())
    }

    /// Moves the subscription to another plan, re-capturing its limits
    ///
    /// The captured limits govern quota enforcement from this point on;
    /// billing proration is the caller's concern.
    pub fn change_plan(&mut self, plan: &Plan, now: DateTime<Utc>) -> Result<(), SubscriptionError> {
        if self.status == SubscriptionStatus::Canceled {
            return Err(SubscriptionError::validation(
                "cannot change plan on a canceled subscription",
            ));
        }
        debug!(
            subscription_id = %self.id,
            old_plan = %self.plan_id,
            new_plan = %plan.id,
            "plan change"
        );
        self.plan_id = plan.id;
        self.limits = plan.limits;
        self.updated_at = now;
        Ok(())
    }

    /// Returns true if the stored status is terminal
    pub fn is_canceled(&self) -> bool {
        self.status == SubscriptionStatus::Canceled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanLimits;
    use chrono::{Duration, TimeZone};
    use core_kernel::{Currency, Money};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn test_plan() -> Plan {
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

    fn trial_sub() -> AccountSubscription {
        AccountSubscription::start_trial(
            AccountId::new(),
            &test_plan(),
            BillingCycle::Monthly,
            now(),
        )
        .unwrap()
    }

    #[test]
    fn test_start_trial_invariant() {
        let sub = trial_sub();
        assert_eq!(sub.status, SubscriptionStatus::Trialing);
        let trial_end = sub.trial_ends_at.expect("trialing requires a trial end");
        assert!(trial_end > now());
        assert_eq!(trial_end - now(), Duration::days(14));
    }

    #[test]
    fn test_first_charge_activates_and_anchors_period() {
        let mut sub = trial_sub();
        let charge_at = now() + Duration::days(10);

        sub.transition(SubscriptionEvent::ChargeSucceeded, charge_at)
            .unwrap();

        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.current_period.start, charge_at);
    }

    #[test]
    fn test_past_due_recovery() {
        let mut sub = trial_sub();
        sub.transition(SubscriptionEvent::ChargeSucceeded, now()).unwrap();
        sub.transition(SubscriptionEvent::ChargeFailed, now()).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::PastDue);

        sub.transition(SubscriptionEvent::ChargeSucceeded, now()).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
    }

    #[test]
    fn test_deferred_cancel_waits_for_period_end() {
        let mut sub = trial_sub();
        sub.transition(SubscriptionEvent::ChargeSucceeded, now()).unwrap();

        sub.transition(SubscriptionEvent::CancelAtPeriodEnd, now()).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert!(sub.cancel_at_period_end);

        let period_end = sub.current_period.end;
        sub.transition(SubscriptionEvent::PeriodEnded, period_end).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Canceled);
        assert_eq!(sub.canceled_at, Some(period_end));
    }

    #[test]
    fn test_period_ended_without_flag_is_rejected() {
        let mut sub = trial_sub();
        sub.transition(SubscriptionEvent::ChargeSucceeded, now()).unwrap();

        let result = sub.transition(SubscriptionEvent::PeriodEnded, now());
        assert!(matches!(
            result,
            Err(SubscriptionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_canceled_is_terminal() {
        let mut sub = trial_sub();
        sub.transition(SubscriptionEvent::CancelNow, now()).unwrap();
        assert!(sub.is_canceled());

        for event in [
            SubscriptionEvent::ChargeSucceeded,
            SubscriptionEvent::ChargeFailed,
            SubscriptionEvent::RetriesExhausted,
            SubscriptionEvent::TrialExpired,
            SubscriptionEvent::CancelNow,
            SubscriptionEvent::CancelAtPeriodEnd,
            SubscriptionEvent::PeriodEnded,
        ] {
            let result = sub.transition(event, now());
            assert!(
                matches!(result, Err(SubscriptionError::InvalidTransition { .. })),
                "{event} should be rejected from canceled"
            );
        }
    }

    #[test]
    fn test_change_plan_recaptures_limits() {
        let mut sub = trial_sub();
        let bigger = Plan::new(
            "Pro",
            Money::from_minor(19900, Currency::BRL),
            Money::from_minor(199900, Currency::BRL),
            PlanLimits::unbounded(),
            2,
        );

        sub.change_plan(&bigger, now()).unwrap();
        assert_eq!(sub.plan_id, bigger.id);
        assert_eq!(sub.limits, PlanLimits::unbounded());
    }

    #[test]
    fn test_change_plan_rejected_after_cancel() {
        let mut sub = trial_sub();
        sub.transition(SubscriptionEvent::CancelNow, now()).unwrap();

        let result = sub.change_plan(&test_plan(), now());
        assert!(matches!(result, Err(SubscriptionError::Validation(_))));
    }
}
