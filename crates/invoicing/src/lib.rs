//! Invoicing read model.
//!
//! Documents, their line items and the transactions recorded against them, as
//! produced by the invoicing workflow. Everything here is read-only input for
//! the reporting layer.

pub mod document;
pub mod transaction;

pub use document::{Document, DocumentId, DocumentStatus, LineItem, LineProduct};
pub use transaction::{Transaction, TransactionId, TransactionKind};
