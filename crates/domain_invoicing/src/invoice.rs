//! Invoice aggregate
//!
//! An invoice belongs to exactly one account and one client. Its total is
//! always recomputed from the line items plus tax, never stored as an
//! independently-editable field, and its items freeze the moment the status
//! leaves `Draft`. Invoices are never physically deleted once payments
//! exist; cancellation is a soft status transition.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{AccountId, ClientId, Currency, InvoiceId, InvoiceItemId, Money, Rate, Ratio};

use crate::error::InvoicingError;
use crate::payment::Payment;

/// Stored invoice status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Being drafted; items still mutable
    Draft,
    /// Finalized and issued to the client
    Sent,
    /// Partial payment received
    Partial,
    /// Fully paid
    Paid,
    /// Flagged past due by an explicit action (read paths normally derive
    /// this instead of storing it)
    Overdue,
    /// Soft-cancelled; kept for audit
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Partial => "partial",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A line item on an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Item ID
    pub id: InvoiceItemId,
    /// Description (e.g., "Consultation", "Rabies vaccine")
    pub description: String,
    /// Quantity, strictly positive
    pub quantity: Decimal,
    /// Unit price
    pub unit_price: Money,
    /// Discount percentage, 0 to 100
    pub discount_percent: Decimal,
}

impl InvoiceItem {
    /// Creates a new line item
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Money,
    ) -> Result<Self, InvoicingError> {
        if quantity <= Decimal::ZERO {
            return Err(InvoicingError::validation("quantity must be positive"));
        }
        Ok(Self {
            id: InvoiceItemId::new_v7(),
            description: description.into(),
            quantity,
            unit_price,
            discount_percent: Decimal::ZERO,
        })
    }

    /// Applies a percentage discount to this item
    pub fn with_discount(mut self, percent: Decimal) -> Result<Self, InvoicingError> {
        validate_discount(percent)?;
        self.discount_percent = percent;
        Ok(self)
    }

    /// The line total: quantity x unit price x (1 - discount), rounded
    /// half-up to the nearest minor unit at the line level
    pub fn total(&self) -> Result<Money, InvoicingError> {
        let gross = self.unit_price.multiply_quantity(self.quantity)?;
        let net = Rate::from_percentage(self.discount_percent)
            .complement()
            .apply(&gross)?;
        Ok(net)
    }
}

pub(crate) fn validate_discount(percent: Decimal) -> Result<(), InvoicingError> {
    if percent < Decimal::ZERO || percent > dec!(100) {
        return Err(InvoicingError::validation(
            "discount percent must be between 0 and 100",
        ));
    }
    Ok(())
}

/// An invoice issued by a practice account to one of its clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    /// Issuing tenant account
    pub account_id: AccountId,
    /// Billed client
    pub client_id: ClientId,
    /// Invoice currency; every item, tax, and payment must match
    pub currency: Currency,
    /// Issue date
    pub issue_date: NaiveDate,
    /// Payment due date
    pub due_date: NaiveDate,
    /// Ordered line items; frozen once status leaves Draft
    pub items: Vec<InvoiceItem>,
    /// Tax amount added on top of the item totals
    pub tax_amount: Money,
    /// Stored status
    pub status: InvoiceStatus,
    /// Cached sum of the payment ledger, recomputed on every insert
    pub paid_amount: Money,
    /// Append-only payment ledger
    pub payments: Vec<Payment>,
    /// Fiscal (NFe) number, written back once by the fiscal collaborator
    pub fiscal_number: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates a new draft invoice
    pub fn new(
        account_id: AccountId,
        client_id: ClientId,
        currency: Currency,
        due_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: InvoiceId::new_v7(),
            account_id,
            client_id,
            currency,
            issue_date: now.date_naive(),
            due_date,
            items: Vec::new(),
            tax_amount: Money::zero(currency),
            status: InvoiceStatus::Draft,
            paid_amount: Money::zero(currency),
            payments: Vec::new(),
            fiscal_number: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The invoice total: sum of line totals plus tax
    ///
    /// Always derived; there is no stored total to drift out of sync.
    pub fn total_amount(&self) -> Result<Money, InvoicingError> {
        let mut total = Money::zero(self.currency);
        for item in &self.items {
            total = total.checked_add(&item.total()?)?;
        }
        Ok(total.checked_add(&self.tax_amount)?)
    }

    /// The open balance: total minus paid
    pub fn balance_due(&self) -> Result<Money, InvoicingError> {
        Ok(self.total_amount()?.checked_sub(&self.paid_amount)?)
    }

    /// Settlement progress as a ratio, if the invoice has a nonzero total
    pub fn settlement_progress(&self) -> Result<Option<Ratio>, InvoicingError> {
        let total = self.total_amount()?;
        if total.is_zero() {
            return Ok(None);
        }
        Ok(Some(self.paid_amount.ratio_of(&total)?))
    }

    /// Returns true once the items are frozen
    pub fn is_locked(&self) -> bool {
        self.status != InvoiceStatus::Draft
    }

    fn ensure_draft(&self) -> Result<(), InvoicingError> {
        if self.is_locked() {
            return Err(InvoicingError::InvoiceLocked {
                status: self.status,
            });
        }
        Ok(())
    }

    fn ensure_item_currency(&self, item: &InvoiceItem) -> Result<(), InvoicingError> {
        if item.unit_price.currency() != self.currency {
            return Err(InvoicingError::validation(format!(
                "item currency {} does not match invoice currency {}",
                item.unit_price.currency(),
                self.currency
            )));
        }
        Ok(())
    }

    /// Adds an item; fails with `InvoiceLocked` once finalized
    pub fn add_item(&mut self, item: InvoiceItem, now: DateTime<Utc>) -> Result<(), InvoicingError> {
        self.ensure_draft()?;
        self.ensure_item_currency(&item)?;
        self.items.push(item);
        self.updated_at = now;
        Ok(())
    }

    /// Sets the discount on an existing item; draft only
    pub fn apply_discount(
        &mut self,
        item_id: InvoiceItemId,
        percent: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), InvoicingError> {
        self.ensure_draft()?;
        validate_discount(percent)?;
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| {
                InvoicingError::validation(format!("no item {item_id} on invoice"))
            })?;
        item.discount_percent = percent;
        self.updated_at = now;
        Ok(())
    }

    /// Sets the tax amount; draft only
    pub fn set_tax(&mut self, tax: Money, now: DateTime<Utc>) -> Result<(), InvoicingError> {
        self.ensure_draft()?;
        if tax.currency() != self.currency {
            return Err(InvoicingError::validation(format!(
                "tax currency {} does not match invoice currency {}",
                tax.currency(),
                self.currency
            )));
        }
        if tax.is_negative() {
            return Err(InvoicingError::validation("tax amount cannot be negative"));
        }
        self.tax_amount = tax;
        self.updated_at = now;
        Ok(())
    }

    /// Finalizes the draft: draft -> sent, items frozen from here on
    pub fn finalize(&mut self, now: DateTime<Utc>) -> Result<(), InvoicingError> {
        if self.status != InvoiceStatus::Draft {
            return Err(InvoicingError::InvalidTransition {
                status: self.status,
                action: "finalize",
            });
        }
        if self.items.is_empty() {
            return Err(InvoicingError::validation(
                "cannot finalize an invoice with no items",
            ));
        }
        self.status = InvoiceStatus::Sent;
        self.updated_at = now;
        Ok(())
    }

    /// Soft-cancels the invoice
    ///
    /// Only permitted while nothing has been paid; a partially paid invoice
    /// is resolved via refund first.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), InvoicingError> {
        if self.status == InvoiceStatus::Cancelled {
            return Err(InvoicingError::InvalidTransition {
                status: self.status,
                action: "cancel",
            });
        }
        if !self.paid_amount.is_zero() {
            return Err(InvoicingError::CannotCancelPaidInvoice {
                paid: self.paid_amount,
            });
        }
        self.status = InvoiceStatus::Cancelled;
        self.updated_at = now;
        Ok(())
    }

    /// Records the fiscal (NFe) number supplied by the fiscal collaborator
    ///
    /// Write-once; the core records the number and never validates fiscal
    /// compliance.
    pub fn set_fiscal_number(
        &mut self,
        number: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), InvoicingError> {
        if self.fiscal_number.is_some() {
            return Err(InvoicingError::validation("fiscal number already recorded"));
        }
        self.fiscal_number = Some(number.into());
        self.updated_at = now;
        Ok(())
    }
}
