//! In-Memory Port Adapters
//!
//! Hash-map backed implementations of the domain storage ports for tests
//! and examples. Last-write-wins; the optimistic-concurrency and isolation
//! contracts real adapters must honor are not enforced here.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use core_kernel::{AccountId, DomainPort, InvoiceId, PortError};
use domain_invoicing::invoice::Invoice;
use domain_invoicing::payment::Payment;
use domain_invoicing::ports::InvoiceStore;
use domain_subscription::ports::{ResourceCounterStore, SubscriptionStore};
use domain_subscription::quota::{ResourceCounters, ResourceKind};
use domain_subscription::subscription::AccountSubscription;

/// In-memory [`SubscriptionStore`]
#[derive(Debug, Default, Clone)]
pub struct MemorySubscriptionStore {
    subscriptions: Arc<RwLock<HashMap<AccountId, AccountSubscription>>>,
}

impl MemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainPort for MemorySubscriptionStore {}

#[async_trait]
impl SubscriptionStore for MemorySubscriptionStore {
    async fn load(&self, account_id: AccountId) -> Result<AccountSubscription, PortError> {
        self.subscriptions
            .read()
            .map_err(|_| PortError::internal("subscription store lock poisoned"))?
            .get(&account_id)
            .cloned()
            .ok_or_else(|| PortError::not_found("subscription", account_id))
    }

    async fn save(&self, subscription: &AccountSubscription) -> Result<(), PortError> {
        self.subscriptions
            .write()
            .map_err(|_| PortError::internal("subscription store lock poisoned"))?
            .insert(subscription.account_id, subscription.clone());
        Ok(())
    }
}

/// In-memory [`ResourceCounterStore`]
#[derive(Debug, Default, Clone)]
pub struct MemoryCounterStore {
    counters: Arc<RwLock<HashMap<AccountId, ResourceCounters>>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainPort for MemoryCounterStore {}

#[async_trait]
impl ResourceCounterStore for MemoryCounterStore {
    async fn counters(&self, account_id: AccountId) -> Result<ResourceCounters, PortError> {
        Ok(self
            .counters
            .read()
            .map_err(|_| PortError::internal("counter store lock poisoned"))?
            .get(&account_id)
            .copied()
            .unwrap_or_else(ResourceCounters::zero))
    }

    async fn increment(
        &self,
        account_id: AccountId,
        kind: ResourceKind,
        delta: u64,
    ) -> Result<(), PortError> {
        let mut counters = self
            .counters
            .write()
            .map_err(|_| PortError::internal("counter store lock poisoned"))?;
        let entry = counters.entry(account_id).or_insert_with(ResourceCounters::zero);
        let slot = match kind {
            ResourceKind::Users => &mut entry.users,
            ResourceKind::Animals => &mut entry.animals,
            ResourceKind::Clients => &mut entry.clients,
            ResourceKind::StorageGb => &mut entry.storage_gb,
        };
        *slot = slot.saturating_add(delta);
        Ok(())
    }

    async fn decrement(
        &self,
        account_id: AccountId,
        kind: ResourceKind,
        delta: u64,
    ) -> Result<(), PortError> {
        let mut counters = self
            .counters
            .write()
            .map_err(|_| PortError::internal("counter store lock poisoned"))?;
        let entry = counters.entry(account_id).or_insert_with(ResourceCounters::zero);
        let slot = match kind {
            ResourceKind::Users => &mut entry.users,
            ResourceKind::Animals => &mut entry.animals,
            ResourceKind::Clients => &mut entry.clients,
            ResourceKind::StorageGb => &mut entry.storage_gb,
        };
        *slot = slot.saturating_sub(delta);
        Ok(())
    }
}

/// In-memory [`InvoiceStore`]
#[derive(Debug, Default, Clone)]
pub struct MemoryInvoiceStore {
    invoices: Arc<RwLock<HashMap<InvoiceId, Invoice>>>,
}

impl MemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainPort for MemoryInvoiceStore {}

#[async_trait]
impl InvoiceStore for MemoryInvoiceStore {
    async fn load(&self, id: InvoiceId) -> Result<Invoice, PortError> {
        self.invoices
            .read()
            .map_err(|_| PortError::internal("invoice store lock poisoned"))?
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("invoice", id))
    }

    async fn save(&self, invoice: &Invoice) -> Result<(), PortError> {
        self.invoices
            .write()
            .map_err(|_| PortError::internal("invoice store lock poisoned"))?
            .insert(invoice.id, invoice.clone());
        Ok(())
    }

    async fn list_for_account(&self, account_id: AccountId) -> Result<Vec<Invoice>, PortError> {
        let invoices = self
            .invoices
            .read()
            .map_err(|_| PortError::internal("invoice store lock poisoned"))?;
        let mut found: Vec<Invoice> = invoices
            .values()
            .filter(|i| i.account_id == account_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(found)
    }

    async fn payments_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Payment>, PortError> {
        let invoices = self.list_for_account(account_id).await?;
        let mut payments: Vec<Payment> = invoices
            .into_iter()
            .flat_map(|i| i.payments)
            .collect();
        payments.sort_by(|a, b| a.received_at.cmp(&b.received_at));
        Ok(payments)
    }
}
