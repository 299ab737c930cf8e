use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::Serialize;

use backoffice_invoicing::Document;
use backoffice_parties::Party;

use super::{DocumentRow, PartyNames};
use crate::aggregate::summarize_document;
use crate::config::ReportContext;
use crate::filter::PeriodFilter;
use crate::money::{TaxSplit, round_currency};
use crate::rollup::Rollup;

/// Global figures for a year, optionally narrowed to some months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub year: i32,
    pub months: BTreeSet<u32>,
    pub pending_count: usize,
    pub near_due_count: usize,
    pub overdue_count: usize,
    pub pending_income: Decimal,
    pub pending_expense: Decimal,
    pub profit: Decimal,
    pub total_expense: Decimal,
    /// Tax contained in the gross expense total.
    pub expense_tax: Decimal,
    pub near_due: Vec<DocumentRow>,
    pub pending: Vec<DocumentRow>,
}

/// Documents without an issue date never fall inside a period.
pub fn dashboard(
    documents: &[Document],
    parties: &[Party],
    period: &PeriodFilter,
    ctx: &ReportContext,
) -> Dashboard {
    let summaries = documents
        .iter()
        .filter(|d| d.issue_date.is_some_and(|issued| period.contains(issued)))
        .map(|d| summarize_document(d, ctx));
    let rollup = Rollup::from_summaries(summaries, ctx.today);

    let names = PartyNames::new(parties);
    let totals = &rollup.totals;
    let expense = TaxSplit::from_gross(totals.total_expense, ctx.config.tax_rate).rounded();

    Dashboard {
        year: period.year,
        months: period.months.clone(),
        pending_count: rollup.pending_count,
        near_due_count: rollup.near_due_count,
        overdue_count: rollup.overdue_count,
        pending_income: round_currency(totals.pending_income),
        pending_expense: round_currency(totals.pending_expense),
        profit: round_currency(totals.profit()),
        total_expense: expense.gross,
        expense_tax: expense.tax,
        near_due: rollup.near_due.iter().map(|s| DocumentRow::new(s, &names)).collect(),
        pending: rollup.pending.iter().map(|s| DocumentRow::new(s, &names)).collect(),
    }
}
