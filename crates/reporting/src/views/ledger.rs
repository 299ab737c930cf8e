use rust_decimal::Decimal;
use serde::Serialize;

use backoffice_invoicing::Document;
use backoffice_parties::{Party, PartyId};

use crate::aggregate::summarize_document;
use crate::config::ReportContext;
use crate::money::round_currency;
use crate::rollup::Rollup;

/// One line of the party ledger list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub party_id: PartyId,
    pub name: String,
    pub tax_id: Option<String>,
    pub document_count: usize,
    pub total_income: Decimal,
    pub pending_income: Decimal,
    pub total_expense: Decimal,
    pub pending_expense: Decimal,
}

/// Running balances for every active party, ordered by name.
///
/// All of a party's documents count, void ones included.
pub fn party_ledger(parties: &[Party], documents: &[Document], ctx: &ReportContext) -> Vec<LedgerEntry> {
    let rollup = Rollup::from_summaries(
        documents
            .iter()
            .filter(|d| d.party_id.is_some())
            .map(|d| summarize_document(d, ctx)),
        ctx.today,
    );

    let mut active: Vec<&Party> = parties.iter().filter(|p| p.is_active()).collect();
    active.sort_by(|a, b| a.name().cmp(b.name()));

    active
        .into_iter()
        .map(|party| {
            let totals = rollup.party(party.id_typed());
            LedgerEntry {
                party_id: party.id_typed(),
                name: party.name().to_string(),
                tax_id: party.tax_id().map(|t| t.formatted()),
                document_count: totals.document_count,
                total_income: round_currency(totals.total_income),
                pending_income: round_currency(totals.pending_income),
                total_expense: round_currency(totals.total_expense),
                pending_expense: round_currency(totals.pending_expense),
            }
        })
        .collect()
}
