use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use backoffice_invoicing::{Document, DocumentStatus, TransactionKind};
use backoffice_parties::{Party, PartyId};

use crate::aggregate::{DocumentSummary, summarize_document};
use crate::config::ReportContext;
use crate::filter::DocumentQuery;
use crate::money::round_currency;
use crate::rollup::Rollup;

/// Row handed to spreadsheet/PDF renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub document: String,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub kind: Option<TransactionKind>,
    pub status: DocumentStatus,
    pub net: Decimal,
    pub tax: Decimal,
    pub gross: Decimal,
    pub paid: Decimal,
    pub outstanding: Decimal,
    /// Only set for open documents past their due date.
    pub days_overdue: Option<i64>,
}

impl ReportRow {
    fn new(summary: &DocumentSummary, tax_rate: Decimal) -> Self {
        let split = summary.tax_split(tax_rate).rounded();
        Self {
            document: summary.number.clone(),
            issue_date: summary.issue_date,
            due_date: summary.due_date,
            kind: summary.kind,
            status: summary.status,
            net: split.net,
            tax: split.tax,
            gross: split.gross,
            paid: round_currency(summary.paid_total),
            outstanding: round_currency(summary.outstanding),
            days_overdue: summary.due.days_overdue(),
        }
    }
}

/// Debt report for one party: what they owe us and what we owe them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebtReport {
    pub party_id: PartyId,
    pub party_name: String,
    pub tax_id: Option<String>,
    pub generated_on: NaiveDate,
    /// Outstanding on income documents.
    pub balance_in_favor: Decimal,
    /// Outstanding on expense documents.
    pub balance_against: Decimal,
    pub rows: Vec<ReportRow>,
}

/// Non-void documents of `party`, by due date (undated last) then number.
pub fn debt_report(party: &Party, documents: &[Document], ctx: &ReportContext) -> DebtReport {
    let query = DocumentQuery::for_party(party.id_typed()).without_void();
    let mut summaries: Vec<DocumentSummary> = documents
        .iter()
        .filter(|d| query.matches(d))
        .map(|d| summarize_document(d, ctx))
        .collect();
    summaries.sort_by(|a, b| {
        // `None` sorts first for Option, so compare "is undated" before the date.
        (a.due_date.is_none(), a.due_date)
            .cmp(&(b.due_date.is_none(), b.due_date))
            .then_with(|| a.number.cmp(&b.number))
    });

    let rows = summaries
        .iter()
        .map(|s| ReportRow::new(s, ctx.config.tax_rate))
        .collect();
    let totals = Rollup::from_summaries(summaries, ctx.today).totals;

    DebtReport {
        party_id: party.id_typed(),
        party_name: party.name().to_string(),
        tax_id: party.tax_id().map(|t| t.formatted()),
        generated_on: ctx.today,
        balance_in_favor: round_currency(totals.pending_income),
        balance_against: round_currency(totals.pending_expense),
        rows,
    }
}
