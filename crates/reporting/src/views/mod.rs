//! Views over the rollup: one per back-office screen or export.
//!
//! Each view selects its documents, summarizes them, reduces them with
//! [`Rollup`](crate::rollup::Rollup) and rounds the figures it presents.

mod dashboard;
mod debt_report;
mod ledger;
mod project;
mod statement;

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use backoffice_invoicing::{DocumentId, DocumentStatus, TransactionKind};
use backoffice_parties::{Party, PartyId};

use crate::aggregate::DocumentSummary;
use crate::money::round_currency;

pub use dashboard::{Dashboard, dashboard};
pub use debt_report::{DebtReport, ReportRow, debt_report};
pub use ledger::{LedgerEntry, party_ledger};
pub use project::{ProjectOverview, ProjectSummary, project_overview, project_summary};
pub use statement::{PartyStatement, party_statement};

/// One document as shown in lists, amounts rounded to whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRow {
    pub document_id: DocumentId,
    pub number: String,
    pub doc_type: Option<String>,
    pub party_id: Option<PartyId>,
    pub party_name: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: DocumentStatus,
    pub kind: Option<TransactionKind>,
    pub gross: Decimal,
    pub paid: Decimal,
    pub outstanding: Decimal,
    pub days_remaining: Option<i64>,
    pub days_overdue: Option<i64>,
}

impl DocumentRow {
    pub(crate) fn new(summary: &DocumentSummary, names: &PartyNames<'_>) -> Self {
        Self {
            document_id: summary.document_id,
            number: summary.number.clone(),
            doc_type: summary.doc_type.clone(),
            party_id: summary.party_id,
            party_name: summary.party_id.and_then(|id| names.get(id)).map(str::to_string),
            issue_date: summary.issue_date,
            due_date: summary.due_date,
            status: summary.status,
            kind: summary.kind,
            gross: round_currency(summary.gross_total),
            paid: round_currency(summary.paid_total),
            outstanding: round_currency(summary.outstanding),
            days_remaining: summary.due.days_remaining(),
            days_overdue: summary.due.days_overdue(),
        }
    }
}

/// Party id to display name.
pub(crate) struct PartyNames<'a>(HashMap<PartyId, &'a str>);

impl<'a> PartyNames<'a> {
    pub(crate) fn new(parties: &'a [Party]) -> Self {
        Self(parties.iter().map(|p| (p.id_typed(), p.name())).collect())
    }

    pub(crate) fn single(party: &'a Party) -> Self {
        Self::new(std::slice::from_ref(party))
    }

    pub(crate) fn get(&self, id: PartyId) -> Option<&'a str> {
        self.0.get(&id).copied()
    }
}
