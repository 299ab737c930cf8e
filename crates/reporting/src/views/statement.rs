use rust_decimal::Decimal;
use serde::Serialize;

use backoffice_invoicing::Document;
use backoffice_parties::{Party, PartyId};

use super::{DocumentRow, PartyNames};
use crate::aggregate::{DocumentSummary, summarize_document};
use crate::config::ReportContext;
use crate::filter::{DateRange, DocumentQuery};
use crate::money::{TaxSplit, round_currency};
use crate::rollup::Rollup;

/// Account statement for one party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyStatement {
    pub party_id: PartyId,
    pub party_name: String,
    pub issued: DateRange,
    /// Newest issue date first.
    pub documents: Vec<DocumentRow>,
    pub pending_count: usize,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// total income − total expense.
    pub balance: Decimal,
    pub pending_income: Decimal,
    pub pending_expense: Decimal,
    pub expense_net: Decimal,
    pub expense_tax: Decimal,
}

/// Void documents stay listed; with no transactions they add no money.
pub fn party_statement(
    party: &Party,
    documents: &[Document],
    issued: DateRange,
    ctx: &ReportContext,
) -> PartyStatement {
    let query = DocumentQuery::for_party(party.id_typed()).issued_within(issued);
    let mut summaries: Vec<DocumentSummary> = documents
        .iter()
        .filter(|d| query.matches(d))
        .map(|d| summarize_document(d, ctx))
        .collect();
    summaries.sort_by(|a, b| {
        b.issue_date
            .cmp(&a.issue_date)
            .then_with(|| b.number.cmp(&a.number))
    });

    let names = PartyNames::single(party);
    let rows = summaries.iter().map(|s| DocumentRow::new(s, &names)).collect();
    let rollup = Rollup::from_summaries(summaries, ctx.today);
    let totals = &rollup.totals;
    let expense = TaxSplit::from_gross(totals.total_expense, ctx.config.tax_rate).rounded();

    PartyStatement {
        party_id: party.id_typed(),
        party_name: party.name().to_string(),
        issued,
        documents: rows,
        pending_count: rollup.pending_count,
        total_income: round_currency(totals.total_income),
        total_expense: expense.gross,
        balance: round_currency(totals.profit()),
        pending_income: round_currency(totals.pending_income),
        pending_expense: round_currency(totals.pending_expense),
        expense_net: expense.net,
        expense_tax: expense.tax,
    }
}
