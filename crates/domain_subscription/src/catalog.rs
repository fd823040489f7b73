//! Plan catalog
//!
//! Read-mostly store keyed by plan id. Publishing is append-only; a price
//! change is a new plan, and withdrawn plans are retired rather than
//! deleted so existing subscriptions keep resolving their plan reference.

use std::collections::HashMap;

use core_kernel::PlanId;
use tracing::debug;

use crate::error::SubscriptionError;
use crate::plan::Plan;

/// The set of published subscription plans
#[derive(Debug, Default)]
pub struct PlanCatalog {
    plans: HashMap<PlanId, Plan>,
}

impl PlanCatalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self {
            plans: HashMap::new(),
        }
    }

    /// Publishes a plan
    ///
    /// Fails if the id is already published; catalog entries are never
    /// edited in place.
    pub fn publish(&mut self, plan: Plan) -> Result<(), SubscriptionError> {
        if self.plans.contains_key(&plan.id) {
            return Err(SubscriptionError::PlanAlreadyPublished(plan.id));
        }
        debug!(plan_id = %plan.id, name = %plan.name, "plan published");
        self.plans.insert(plan.id, plan);
        Ok(())
    }

    /// Looks up a plan by id
    pub fn get(&self, id: &PlanId) -> Result<&Plan, SubscriptionError> {
        self.plans
            .get(id)
            .ok_or(SubscriptionError::PlanNotFound(*id))
    }

    /// Withdraws a plan from new subscriptions
    ///
    /// The entry stays resolvable for subscriptions already on it.
    pub fn retire(&mut self, id: &PlanId) -> Result<(), SubscriptionError> {
        let plan = self
            .plans
            .get_mut(id)
            .ok_or(SubscriptionError::PlanNotFound(*id))?;
        plan.active = false;
        debug!(plan_id = %id, "plan retired");
        Ok(())
    }

    /// Returns the active plans ordered by sort order
    pub fn list_active(&self) -> Vec<&Plan> {
        let mut active: Vec<&Plan> = self.plans.values().filter(|p| p.active).collect();
        active.sort_by_key(|p| p.sort_order);
        active
    }

    /// Returns the number of published plans, retired included
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// Returns true if no plan has been published
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanLimits;
    use core_kernel::{Currency, Money};

    fn plan(name: &str, sort_order: i32) -> Plan {
        Plan::new(
            name,
            Money::from_minor(9900, Currency::BRL),
            Money::from_minor(99900, Currency::BRL),
            PlanLimits::unbounded(),
            sort_order,
        )
    }

    #[test]
    fn test_publish_and_get() {
        let mut catalog = PlanCatalog::new();
        let basic = plan("Basic", 1);
        let id = basic.id;

        catalog.publish(basic).unwrap();
        assert_eq!(catalog.get(&id).unwrap().name, "Basic");
    }

    #[test]
    fn test_get_missing_plan() {
        let catalog = PlanCatalog::new();
        let result = catalog.get(&PlanId::new());
        assert!(matches!(result, Err(SubscriptionError::PlanNotFound(_))));
    }

    #[test]
    fn test_republish_rejected() {
        let mut catalog = PlanCatalog::new();
        let basic = plan("Basic", 1);
        let dup = basic.clone();

        catalog.publish(basic).unwrap();
        let result = catalog.publish(dup);
        assert!(matches!(
            result,
            Err(SubscriptionError::PlanAlreadyPublished(_))
        ));
    }

    #[test]
    fn test_list_active_ordering_and_retirement() {
        let mut catalog = PlanCatalog::new();
        let pro = plan("Pro", 2);
        let basic = plan("Basic", 1);
        let legacy = plan("Legacy", 0);
        let legacy_id = legacy.id;

        catalog.publish(pro).unwrap();
        catalog.publish(basic).unwrap();
        catalog.publish(legacy).unwrap();
        catalog.retire(&legacy_id).unwrap();

        let names: Vec<&str> = catalog.list_active().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Basic", "Pro"]);

        // Retired plans still resolve by id
        assert!(catalog.get(&legacy_id).is_ok());
        assert!(!catalog.get(&legacy_id).unwrap().active);
    }
}
