//! Financial aggregation over invoicing documents.
//!
//! Everything that turns documents into money figures lives here:
//!
//! - [`aggregate`]: per-document totals, transaction kind and due state
//! - [`rollup`]: folding summaries into totals, counters and sorted lists
//! - [`views`]: dashboard, party statement, party ledger, debt report and
//!   project figures, all built on the two modules above
//! - [`export`]: the row-list contract handed to file renderers
//!
//! The crate is pure: callers fetch documents and pass them in together with a
//! [`ReportContext`] carrying "today" and the configuration.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod money;
pub mod rollup;
pub mod views;

pub use aggregate::{DocumentSummary, DueState, KindResolution, summarize_document, summarize_strict};
pub use config::{ReportContext, ReportingConfig};
pub use error::{AggregationError, ReportError};
pub use export::{CsvRenderer, ReportRenderer, attachment_file_name};
pub use filter::{DateRange, DocumentQuery, PeriodFilter};
pub use money::{TaxSplit, format_amount, round_currency};
pub use rollup::{Rollup, Totals};
pub use views::{
    Dashboard, DebtReport, DocumentRow, LedgerEntry, PartyStatement, ProjectOverview,
    ProjectSummary, ReportRow, dashboard, debt_report, party_ledger, party_statement,
    project_overview, project_summary,
};
