//! Invoicing Domain - Invoices, Payments, and the Payment Ledger
//!
//! This crate owns the money-facing side of the billing core:
//!
//! - draft invoices with line items, per-line discounts, and tax, whose
//!   totals are always recomputed from the items
//! - finalization, which freezes the items for good
//! - an append-only payment ledger per invoice (refunds are negative
//!   entries), with overpayments rejected whole
//! - pure derived display status, so open invoices past their due date
//!   read as `overdue` without any nightly job
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_invoicing::{InvoiceLedger, PaymentMethod};
//!
//! let mut ledger = InvoiceLedger::new();
//! let id = ledger.open_draft(account_id, client_id, currency, due_date, now);
//! ledger.add_item(&id, item, now)?;
//! ledger.finalize(&id, now)?;
//! ledger.record_payment(&id, amount, PaymentMethod::Pix, None, now)?;
//! ```

pub mod error;
pub mod invoice;
pub mod ledger;
pub mod payment;
pub mod ports;
pub mod status;

pub use error::InvoicingError;
pub use invoice::{Invoice, InvoiceItem, InvoiceStatus};
pub use ledger::InvoiceLedger;
pub use payment::{Payment, PaymentMethod, PaymentRecorder};
pub use ports::InvoiceStore;
pub use status::{effective_invoice_status, InvoiceDisplayStatus};
