//! Invoicing domain errors

use core_kernel::{InvoiceId, Money, MoneyError};
use thiserror::Error;

use crate::invoice::InvoiceStatus;

/// Errors that can occur in the invoicing domain
///
/// Every failure carries a structured reason: the UI has to distinguish
/// "this invoice is locked" from "that would overpay the balance".
#[derive(Debug, Error)]
pub enum InvoicingError {
    /// Malformed input (negative amount, discount out of range, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invoice not found in the ledger
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(InvoiceId),

    /// Mutation attempted after finalization froze the items
    #[error("Invoice is locked: items are frozen in status {status}")]
    InvoiceLocked { status: InvoiceStatus },

    /// The operation is not legal for the invoice's current status
    #[error("Invalid transition: cannot {action} an invoice in status {status}")]
    InvalidTransition {
        status: InvoiceStatus,
        action: &'static str,
    },

    /// The payment would push paid beyond the invoice total
    #[error("Overpayment rejected: {attempted} exceeds the open balance {balance}")]
    OverpaymentRejected { attempted: Money, balance: Money },

    /// Cancellation requires a zero paid balance
    #[error("Cannot cancel an invoice with payments against it: {paid} paid")]
    CannotCancelPaidInvoice { paid: Money },

    /// Money error
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}

impl InvoicingError {
    pub fn validation(message: impl Into<String>) -> Self {
        InvoicingError::Validation(message.into())
    }
}
