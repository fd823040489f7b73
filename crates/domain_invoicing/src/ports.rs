//! Storage ports for the invoicing domain

use async_trait::async_trait;

use core_kernel::{AccountId, DomainPort, InvoiceId, PortError};

use crate::invoice::Invoice;
use crate::payment::Payment;

/// Persistence for invoices and their payment ledgers
#[async_trait]
pub trait InvoiceStore: DomainPort {
    /// Loads an invoice with its full payment ledger
    async fn load(&self, id: InvoiceId) -> Result<Invoice, PortError>;

    /// Persists an invoice after a mutation
    ///
    /// A payment appended by [`crate::PaymentRecorder`] and the updated
    /// invoice row must commit atomically; a crash must never leave a
    /// payment the cached `paid_amount` does not reflect.
    async fn save(&self, invoice: &Invoice) -> Result<(), PortError>;

    /// Lists every invoice for an account
    async fn list_for_account(&self, account_id: AccountId) -> Result<Vec<Invoice>, PortError>;

    /// Lists every payment entry for an account across its invoices
    async fn payments_for_account(&self, account_id: AccountId)
        -> Result<Vec<Payment>, PortError>;
}
