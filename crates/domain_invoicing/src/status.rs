//! Derived invoice status
//!
//! Overdue is computed on read, not stored: an open invoice whose due date
//! has passed displays as overdue without any nightly sweep, and the stored
//! status stays whatever the last explicit action set it to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::invoice::{Invoice, InvoiceStatus};

/// What a read path should display for an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceDisplayStatus {
    Draft,
    Sent,
    Partial,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceDisplayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceDisplayStatus::Draft => "draft",
            InvoiceDisplayStatus::Sent => "sent",
            InvoiceDisplayStatus::Partial => "partial",
            InvoiceDisplayStatus::Paid => "paid",
            InvoiceDisplayStatus::Overdue => "overdue",
            InvoiceDisplayStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InvoiceDisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Computes the display status of an invoice at `now`
///
/// A `sent` or `partial` invoice whose due date lies strictly before
/// today displays as `overdue`. Every other status passes through
/// unchanged; an invoice due today is not yet overdue.
pub fn effective_invoice_status(invoice: &Invoice, now: DateTime<Utc>) -> InvoiceDisplayStatus {
    let open = matches!(
        invoice.status,
        InvoiceStatus::Sent | InvoiceStatus::Partial | InvoiceStatus::Overdue
    );
    if open && now.date_naive() > invoice.due_date {
        return InvoiceDisplayStatus::Overdue;
    }
    match invoice.status {
        InvoiceStatus::Draft => InvoiceDisplayStatus::Draft,
        InvoiceStatus::Sent => InvoiceDisplayStatus::Sent,
        InvoiceStatus::Partial => InvoiceDisplayStatus::Partial,
        InvoiceStatus::Paid => InvoiceDisplayStatus::Paid,
        InvoiceStatus::Overdue => InvoiceDisplayStatus::Overdue,
        InvoiceStatus::Cancelled => InvoiceDisplayStatus::Cancelled,
    }
}
