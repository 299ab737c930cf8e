//! Per-document aggregation.
//!
//! [`summarize_document`] is the single place where a document's money figures
//! are derived. Every view goes through it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use backoffice_invoicing::{Document, DocumentId, DocumentStatus, Transaction, TransactionKind};
use backoffice_parties::PartyId;
use backoffice_projects::ProjectId;

use crate::config::ReportContext;
use crate::error::AggregationError;
use crate::money::TaxSplit;

/// Where a document stands relative to its due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DueState {
    /// Settled, void, or nothing left to pay.
    NotApplicable,
    /// Open but without a due date.
    NoDueDate,
    Overdue { days_overdue: i64 },
    /// Due within the configured window (today counts).
    NearDue { days_remaining: i64 },
    /// Due later than the window.
    Open { days_remaining: i64 },
}

impl DueState {
    pub fn classify(due_date: Option<NaiveDate>, today: NaiveDate, window_days: i64) -> Self {
        let Some(due) = due_date else {
            return DueState::NoDueDate;
        };

        if due < today {
            return DueState::Overdue {
                days_overdue: (today - due).num_days(),
            };
        }

        let days_remaining = (due - today).num_days();
        if days_remaining <= window_days {
            DueState::NearDue { days_remaining }
        } else {
            DueState::Open { days_remaining }
        }
    }

    pub fn days_overdue(self) -> Option<i64> {
        match self {
            DueState::Overdue { days_overdue } => Some(days_overdue),
            _ => None,
        }
    }

    pub fn days_remaining(self) -> Option<i64> {
        match self {
            DueState::NearDue { days_remaining } | DueState::Open { days_remaining } => {
                Some(days_remaining)
            }
            _ => None,
        }
    }

    pub fn is_overdue(self) -> bool {
        matches!(self, DueState::Overdue { .. })
    }

    pub fn is_near_due(self) -> bool {
        matches!(self, DueState::NearDue { .. })
    }
}

/// Outcome of scanning a document's transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KindResolution {
    pub kind: Option<TransactionKind>,
    /// Both income and expense transactions were attached.
    pub mixed: bool,
}

impl KindResolution {
    /// Any income transaction makes the document income; otherwise any expense
    /// makes it expense; otherwise it stays unclassified.
    pub fn resolve<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut saw_income = false;
        let mut saw_expense = false;
        for t in transactions {
            match t.kind() {
                Some(TransactionKind::Income) => saw_income = true,
                Some(TransactionKind::Expense) => saw_expense = true,
                None => {}
            }
        }

        let kind = if saw_income {
            Some(TransactionKind::Income)
        } else if saw_expense {
            Some(TransactionKind::Expense)
        } else {
            None
        };

        Self {
            kind,
            mixed: saw_income && saw_expense,
        }
    }
}

/// Money figures derived from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub document_id: DocumentId,
    pub number: String,
    pub doc_type: Option<String>,
    pub party_id: Option<PartyId>,
    pub project_id: Option<ProjectId>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: DocumentStatus,
    pub gross_total: Decimal,
    pub paid_total: Decimal,
    /// `max(0, gross_total - paid_total)`.
    pub outstanding: Decimal,
    pub kind: Option<TransactionKind>,
    pub mixed_transactions: bool,
    /// Lines that contributed nothing because no price was available.
    pub unpriced_lines: usize,
    /// Lines left out because their amount, or the running total, overflowed.
    pub overflowed_lines: usize,
    pub due: DueState,
}

impl DocumentSummary {
    /// Pending status with money still owed.
    pub fn is_open(&self) -> bool {
        self.status.is_pending() && self.outstanding > Decimal::ZERO
    }

    pub fn is_income(&self) -> bool {
        self.kind == Some(TransactionKind::Income)
    }

    pub fn is_expense(&self) -> bool {
        self.kind == Some(TransactionKind::Expense)
    }

    pub fn tax_split(&self, rate: Decimal) -> TaxSplit {
        TaxSplit::from_gross(self.gross_total, rate)
    }
}

struct LineSums {
    gross: Decimal,
    paid: Decimal,
    unpriced: usize,
    /// 0-based indexes of lines whose amounts could not be added.
    overflowed: Vec<usize>,
}

fn sum_lines(document: &Document) -> LineSums {
    let mut sums = LineSums {
        gross: Decimal::ZERO,
        paid: Decimal::ZERO,
        unpriced: 0,
        overflowed: Vec::new(),
    };

    for (index, line) in document.lines.iter().enumerate() {
        if !line.is_priced() {
            sums.unpriced += 1;
        }

        // A line adds to both totals or to neither.
        let added = line
            .checked_total()
            .zip(line.checked_paid())
            .and_then(|(total, paid)| {
                Some((sums.gross.checked_add(total)?, sums.paid.checked_add(paid)?))
            });
        match added {
            Some((gross, paid)) => {
                sums.gross = gross;
                sums.paid = paid;
            }
            None => {
                tracing::warn!(
                    document = %document.number,
                    line = index + 1,
                    "line amount overflows; leaving it out of the totals"
                );
                sums.overflowed.push(index);
            }
        }
    }

    sums
}

/// Derive totals, kind and due state for one document.
///
/// Never fails: missing products, prices or quantities count as zero, and a
/// line whose amount overflows is left out and counted in `overflowed_lines`.
pub fn summarize_document(document: &Document, ctx: &ReportContext) -> DocumentSummary {
    build_summary(document, ctx, sum_lines(document))
}

fn build_summary(document: &Document, ctx: &ReportContext, sums: LineSums) -> DocumentSummary {
    let outstanding = sums.gross.saturating_sub(sums.paid).max(Decimal::ZERO);

    let resolution = KindResolution::resolve(&document.transactions);
    if resolution.mixed {
        tracing::warn!(
            document = %document.number,
            "document has both income and expense transactions; counting it as income"
        );
    }

    let due = if document.status.is_pending() && outstanding > Decimal::ZERO {
        DueState::classify(
            document.due_date,
            ctx.today,
            ctx.config.near_due_window_days,
        )
    } else {
        DueState::NotApplicable
    };

    DocumentSummary {
        document_id: document.id,
        number: document.number.clone(),
        doc_type: document.doc_type.clone(),
        party_id: document.party_id,
        project_id: document.project_id,
        issue_date: document.issue_date,
        due_date: document.due_date,
        status: document.status,
        gross_total: sums.gross,
        paid_total: sums.paid,
        outstanding,
        kind: resolution.kind,
        mixed_transactions: resolution.mixed,
        unpriced_lines: sums.unpriced,
        overflowed_lines: sums.overflowed.len(),
        due,
    }
}

/// Like [`summarize_document`], but a line without a priced product is an
/// error instead of a silent zero. A price of zero is still accepted. A line
/// whose amount overflows is an error too.
pub fn summarize_strict(
    document: &Document,
    ctx: &ReportContext,
) -> Result<DocumentSummary, AggregationError> {
    if let Some(line) = document.lines.iter().position(|l| !l.is_priced()) {
        return Err(AggregationError::MissingPrice {
            document: document.number.clone(),
            line: line + 1,
        });
    }

    let sums = sum_lines(document);
    if let Some(&line) = sums.overflowed.first() {
        return Err(AggregationError::AmountOverflow {
            document: document.number.clone(),
            line: line + 1,
        });
    }
    Ok(build_summary(document, ctx, sums))
}
