//! Invoice ledger
//!
//! In-memory collection of invoices keyed by id, exposing the lifecycle
//! operations by id. This is the aggregate the storage port persists;
//! callers that hold an `Invoice` directly can use its methods instead.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

use core_kernel::{AccountId, ClientId, Currency, InvoiceId, InvoiceItemId, Money};

use crate::error::InvoicingError;
use crate::invoice::{Invoice, InvoiceItem};
use crate::payment::{Payment, PaymentMethod, PaymentRecorder};
use crate::status::{effective_invoice_status, InvoiceDisplayStatus};

/// All invoices known to the billing core
#[derive(Debug, Default)]
pub struct InvoiceLedger {
    invoices: HashMap<InvoiceId, Invoice>,
}

impl InvoiceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new draft invoice and returns its id
    pub fn open_draft(
        &mut self,
        account_id: AccountId,
        client_id: ClientId,
        currency: Currency,
        due_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> InvoiceId {
        let invoice = Invoice::new(account_id, client_id, currency, due_date, now);
        let id = invoice.id;
        debug!(invoice_id = %id, account_id = %account_id, "draft invoice opened");
        self.invoices.insert(id, invoice);
        id
    }

    pub fn get(&self, id: &InvoiceId) -> Result<&Invoice, InvoicingError> {
        self.invoices
            .get(id)
            .ok_or(InvoicingError::InvoiceNotFound(*id))
    }

    fn get_mut(&mut self, id: &InvoiceId) -> Result<&mut Invoice, InvoicingError> {
        self.invoices
            .get_mut(id)
            .ok_or(InvoicingError::InvoiceNotFound(*id))
    }

    pub fn add_item(
        &mut self,
        id: &InvoiceId,
        item: InvoiceItem,
        now: DateTime<Utc>,
    ) -> Result<(), InvoicingError> {
        self.get_mut(id)?.add_item(item, now)
    }

    pub fn apply_discount(
        &mut self,
        id: &InvoiceId,
        item_id: InvoiceItemId,
        percent: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), InvoicingError> {
        self.get_mut(id)?.apply_discount(item_id, percent, now)
    }

    pub fn set_tax(
        &mut self,
        id: &InvoiceId,
        tax: Money,
        now: DateTime<Utc>,
    ) -> Result<(), InvoicingError> {
        self.get_mut(id)?.set_tax(tax, now)
    }

    pub fn finalize(&mut self, id: &InvoiceId, now: DateTime<Utc>) -> Result<(), InvoicingError> {
        let invoice = self.get_mut(id)?;
        invoice.finalize(now)?;
        debug!(invoice_id = %id, "invoice finalized");
        Ok(())
    }

    pub fn cancel(&mut self, id: &InvoiceId, now: DateTime<Utc>) -> Result<(), InvoicingError> {
        let invoice = self.get_mut(id)?;
        invoice.cancel(now)?;
        debug!(invoice_id = %id, "invoice cancelled");
        Ok(())
    }

    pub fn set_fiscal_number(
        &mut self,
        id: &InvoiceId,
        number: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), InvoicingError> {
        self.get_mut(id)?.set_fiscal_number(number, now)
    }

    pub fn record_payment(
        &mut self,
        id: &InvoiceId,
        amount: Money,
        method: PaymentMethod,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Payment, InvoicingError> {
        let invoice = self.get_mut(id)?;
        PaymentRecorder::record_payment(invoice, amount, method, note, now)
    }

    pub fn record_refund(
        &mut self,
        id: &InvoiceId,
        amount: Money,
        method: PaymentMethod,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Payment, InvoicingError> {
        let invoice = self.get_mut(id)?;
        PaymentRecorder::record_refund(invoice, amount, method, note, now)
    }

    /// Display status of one invoice at `now`
    pub fn display_status(
        &self,
        id: &InvoiceId,
        now: DateTime<Utc>,
    ) -> Result<InvoiceDisplayStatus, InvoicingError> {
        Ok(effective_invoice_status(self.get(id)?, now))
    }

    /// All invoices for an account, newest first
    pub fn list_for_account(&self, account_id: &AccountId) -> Vec<&Invoice> {
        let mut invoices: Vec<&Invoice> = self
            .invoices
            .values()
            .filter(|i| i.account_id == *account_id)
            .collect();
        invoices.sort_by(|a, b| {
            b.issue_date
                .cmp(&a.issue_date)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        invoices
    }

    /// Open invoices for an account that display as overdue at `now`
    pub fn list_overdue(&self, account_id: &AccountId, now: DateTime<Utc>) -> Vec<&Invoice> {
        self.list_for_account(account_id)
            .into_iter()
            .filter(|i| effective_invoice_status(i, now) == InvoiceDisplayStatus::Overdue)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }
}
