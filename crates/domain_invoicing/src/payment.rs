//! Payment recording
//!
//! Payments are an append-only ledger on the invoice. A recorded payment is
//! immutable; corrections are new entries (refunds are negative payments),
//! never edits. `paid_amount` is recomputed from the ledger on every insert
//! so the cache can never disagree with the entries it summarizes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use core_kernel::{Money, PaymentId};

use crate::error::InvoicingError;
use crate::invoice::{Invoice, InvoiceStatus};

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    Pix,
    BankTransfer,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Pix => "pix",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Other => "other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single immutable entry in an invoice's payment ledger
///
/// Refunds appear as entries with a negative amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Amount paid (negative for refunds)
    pub amount: Money,
    /// Payment method
    pub method: PaymentMethod,
    /// When the payment was received
    pub received_at: DateTime<Utc>,
    /// Optional free-text note ("card ending 4242", refund reason, ...)
    pub note: Option<String>,
}

impl Payment {
    pub fn is_refund(&self) -> bool {
        self.amount.is_negative()
    }
}

/// Records payments and refunds against invoices
///
/// Stateless; all state lives on the invoice it mutates.
pub struct PaymentRecorder;

impl PaymentRecorder {
    /// Records a payment against a finalized invoice
    ///
    /// The invoice must be `sent`, `partial`, or `overdue`. The amount must
    /// be strictly positive, in the invoice currency, and must not push the
    /// paid total past the invoice total; an overpayment is rejected whole
    /// rather than clamped. After the insert the stored status is derived
    /// from the ledger: `paid` when settled, `partial` otherwise.
    pub fn record_payment(
        invoice: &mut Invoice,
        amount: Money,
        method: PaymentMethod,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Payment, InvoicingError> {
        Self::ensure_payable(invoice, "record a payment against")?;
        if amount.currency() != invoice.currency {
            return Err(InvoicingError::validation(format!(
                "payment currency {} does not match invoice currency {}",
                amount.currency(),
                invoice.currency
            )));
        }
        if !amount.is_positive() {
            return Err(InvoicingError::validation(
                "payment amount must be positive",
            ));
        }

        let balance = invoice.balance_due()?;
        if amount > balance {
            return Err(InvoicingError::OverpaymentRejected {
                attempted: amount,
                balance,
            });
        }

        let payment = Self::append(invoice, amount, method, note, now)?;
        debug!(
            invoice_id = %invoice.id,
            amount = %amount,
            status = %invoice.status,
            "payment recorded"
        );
        Ok(payment)
    }

    /// Records a refund as a negative ledger entry
    ///
    /// `amount` is the positive magnitude to refund; it is capped at the
    /// amount actually paid so the ledger can never sum below zero. The
    /// status rolls back to `partial`, or `sent` when everything was
    /// returned.
    pub fn record_refund(
        invoice: &mut Invoice,
        amount: Money,
        method: PaymentMethod,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Payment, InvoicingError> {
        if !matches!(
            invoice.status,
            InvoiceStatus::Partial | InvoiceStatus::Paid | InvoiceStatus::Overdue
        ) {
            return Err(InvoicingError::InvalidTransition {
                status: invoice.status,
                action: "refund",
            });
        }
        if amount.currency() != invoice.currency {
            return Err(InvoicingError::validation(format!(
                "refund currency {} does not match invoice currency {}",
                amount.currency(),
                invoice.currency
            )));
        }
        if !amount.is_positive() {
            return Err(InvoicingError::validation("refund amount must be positive"));
        }

        // Cap at what was actually paid
        let refund = if amount > invoice.paid_amount {
            invoice.paid_amount
        } else {
            amount
        };
        if refund.is_zero() {
            return Err(InvoicingError::validation(
                "nothing paid, nothing to refund",
            ));
        }

        let payment = Self::append(invoice, -refund, method, note, now)?;
        debug!(
            invoice_id = %invoice.id,
            amount = %refund,
            status = %invoice.status,
            "refund recorded"
        );
        Ok(payment)
    }

    fn ensure_payable(invoice: &Invoice, action: &'static str) -> Result<(), InvoicingError> {
        match invoice.status {
            InvoiceStatus::Sent | InvoiceStatus::Partial | InvoiceStatus::Overdue => Ok(()),
            status => Err(InvoicingError::InvalidTransition { status, action }),
        }
    }

    fn append(
        invoice: &mut Invoice,
        amount: Money,
        method: PaymentMethod,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Payment, InvoicingError> {
        let payment = Payment {
            id: PaymentId::new_v7(),
            amount,
            method,
            received_at: now,
            note,
        };
        invoice.payments.push(payment.clone());

        // Recompute the cache from the ledger, then derive the status
        let mut paid = Money::zero(invoice.currency);
        for payment in &invoice.payments {
            paid = paid.checked_add(&payment.amount)?;
        }
        invoice.paid_amount = paid;

        let total = invoice.total_amount()?;
        invoice.status = if !total.is_zero() && invoice.paid_amount == total {
            InvoiceStatus::Paid
        } else if invoice.paid_amount.is_zero() {
            InvoiceStatus::Sent
        } else {
            InvoiceStatus::Partial
        };
        invoice.updated_at = now;
        Ok(payment)
    }
}
