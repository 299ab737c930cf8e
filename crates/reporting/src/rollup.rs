//! Folding document summaries into totals, counters and ordered lists.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use backoffice_invoicing::TransactionKind;
use backoffice_parties::PartyId;

use crate::aggregate::DocumentSummary;

/// Income/expense figures for one bucket (a party, a project, or everything).
///
/// Totals come from gross amounts; pending figures from outstanding amounts.
/// Unclassified documents are counted but contribute no money. Sums saturate
/// at the `Decimal` bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub pending_income: Decimal,
    pub pending_expense: Decimal,
    pub document_count: usize,
}

impl Totals {
    pub fn add(&mut self, summary: &DocumentSummary) {
        self.document_count += 1;
        match summary.kind {
            Some(TransactionKind::Income) => {
                self.total_income = self.total_income.saturating_add(summary.gross_total);
                self.pending_income = self.pending_income.saturating_add(summary.outstanding);
            }
            Some(TransactionKind::Expense) => {
                self.total_expense = self.total_expense.saturating_add(summary.gross_total);
                self.pending_expense = self.pending_expense.saturating_add(summary.outstanding);
            }
            None => {}
        }
    }

    /// total income − total expense, unrounded.
    pub fn profit(&self) -> Decimal {
        self.total_income.saturating_sub(self.total_expense)
    }

    /// pending income − pending expense.
    pub fn pending_balance(&self) -> Decimal {
        self.pending_income.saturating_sub(self.pending_expense)
    }
}

/// Result of one reduction pass over a set of summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Rollup {
    pub totals: Totals,
    pub by_party: BTreeMap<PartyId, Totals>,
    /// Pending status with outstanding > 0.
    pub pending_count: usize,
    pub near_due_count: usize,
    pub overdue_count: usize,
    /// Ascending by days remaining, ties by document number.
    pub near_due: Vec<DocumentSummary>,
    /// Open documents, newest issue date first, ties by document number.
    pub pending: Vec<DocumentSummary>,
}

impl Rollup {
    /// Reduce `summaries` in one pass. `today` stands in for missing issue
    /// dates when ordering the pending list.
    pub fn from_summaries(
        summaries: impl IntoIterator<Item = DocumentSummary>,
        today: NaiveDate,
    ) -> Self {
        let mut rollup = Rollup::default();

        for summary in summaries {
            rollup.totals.add(&summary);
            if let Some(party) = summary.party_id {
                rollup.by_party.entry(party).or_default().add(&summary);
            }

            if summary.due.is_overdue() {
                rollup.overdue_count += 1;
            }
            if summary.due.is_near_due() {
                rollup.near_due_count += 1;
                rollup.near_due.push(summary.clone());
            }
            if summary.is_open() {
                rollup.pending_count += 1;
                rollup.pending.push(summary);
            }
        }

        rollup.near_due.sort_by(|a, b| {
            a.due
                .days_remaining()
                .cmp(&b.due.days_remaining())
                .then_with(|| a.number.cmp(&b.number))
        });
        rollup.pending.sort_by(|a, b| {
            Reverse(a.issue_date.unwrap_or(today))
                .cmp(&Reverse(b.issue_date.unwrap_or(today)))
                .then_with(|| a.number.cmp(&b.number))
        });

        tracing::debug!(
            documents = rollup.totals.document_count,
            parties = rollup.by_party.len(),
            pending = rollup.pending_count,
            near_due = rollup.near_due_count,
            overdue = rollup.overdue_count,
            "rollup complete"
        );

        rollup
    }

    pub fn party(&self, party_id: PartyId) -> Totals {
        self.by_party.get(&party_id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{DueState, summarize_document};
    use crate::config::ReportContext;
    use backoffice_invoicing::{
        Document, DocumentId, DocumentStatus, LineItem, LineProduct, Transaction, TransactionId,
    };
    use backoffice_products::ProductId;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 5, 10)
    }

    fn open_doc(number: &str, gross: Decimal, kind: Transaction) -> Document {
        let mut d = Document::new(DocumentId::generate(), number, DocumentStatus::Pending);
        d.lines.push(LineItem {
            product: Some(LineProduct {
                product_id: ProductId::generate(),
                gross_price: Some(gross),
            }),
            quantity: Some(Decimal::ONE),
            quantity_paid: Some(Decimal::ZERO),
        });
        d.transactions.push(kind);
        d
    }

    fn summarize(docs: &[Document]) -> Vec<DocumentSummary> {
        let ctx = ReportContext::new(today());
        docs.iter().map(|d| summarize_document(d, &ctx)).collect()
    }

    #[test]
    fn near_due_sorted_by_days_remaining() {
        let docs: Vec<Document> = [("A", 5), ("B", 0), ("C", 7)]
            .into_iter()
            .map(|(n, days)| {
                let mut d = open_doc(n, dec!(100), Transaction::income());
                d.due_date = Some(today() + chrono::Duration::days(days));
                d
            })
            .collect();

        let rollup = Rollup::from_summaries(summarize(&docs), today());
        let days: Vec<_> = rollup
            .near_due
            .iter()
            .filter_map(|s| s.due.days_remaining())
            .collect();
        assert_eq!(days, vec![0, 5, 7]);
        assert_eq!(rollup.near_due_count, 3);
    }

    #[test]
    fn pending_sorted_newest_first() {
        let mut older = open_doc("1", dec!(100), Transaction::income());
        older.issue_date = Some(date(2024, 1, 1));
        let mut newer = open_doc("2", dec!(100), Transaction::income());
        newer.issue_date = Some(date(2024, 3, 1));

        let rollup = Rollup::from_summaries(summarize(&[older, newer]), today());
        let dates: Vec<_> = rollup.pending.iter().map(|s| s.issue_date).collect();
        assert_eq!(dates, vec![Some(date(2024, 3, 1)), Some(date(2024, 1, 1))]);
    }

    #[test]
    fn undated_pending_documents_sort_as_today() {
        let undated = open_doc("1", dec!(100), Transaction::income());
        let mut future = open_doc("2", dec!(100), Transaction::income());
        future.issue_date = Some(date(2024, 6, 1));
        let mut past = open_doc("3", dec!(100), Transaction::income());
        past.issue_date = Some(date(2024, 1, 1));

        let rollup = Rollup::from_summaries(summarize(&[past, undated, future]), today());
        let numbers: Vec<_> = rollup.pending.iter().map(|s| s.number.as_str()).collect();
        assert_eq!(numbers, vec!["2", "1", "3"]);
    }

    #[test]
    fn totals_split_by_kind_and_party() {
        let client = PartyId::generate();
        let mut sale = open_doc("1", dec!(1190), Transaction::income());
        sale.party_id = Some(client);
        let mut purchase = open_doc("2", dec!(595), Transaction::expense());
        purchase.party_id = Some(client);
        purchase.status = DocumentStatus::Paid;
        purchase.lines[0].quantity_paid = Some(Decimal::ONE);
        let unclassified = open_doc("3", dec!(50), Transaction::new(TransactionId::generate(), "OTRO"));

        let rollup = Rollup::from_summaries(summarize(&[sale, purchase, unclassified]), today());

        assert_eq!(rollup.totals.total_income, dec!(1190));
        assert_eq!(rollup.totals.total_expense, dec!(595));
        assert_eq!(rollup.totals.pending_income, dec!(1190));
        assert_eq!(rollup.totals.pending_expense, Decimal::ZERO);
        assert_eq!(rollup.totals.document_count, 3);
        assert_eq!(rollup.totals.profit(), dec!(595));

        let party = rollup.party(client);
        assert_eq!(party.document_count, 2);
        assert_eq!(party.total_income, dec!(1190));
        assert_eq!(rollup.pending_count, 2);
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let docs = [
            open_doc("1", Decimal::MAX, Transaction::income()),
            open_doc("2", Decimal::MAX, Transaction::income()),
            open_doc("3", Decimal::MAX, Transaction::expense()),
        ];
        let rollup = Rollup::from_summaries(summarize(&docs), today());
        assert_eq!(rollup.totals.total_income, Decimal::MAX);
        assert_eq!(rollup.totals.pending_income, Decimal::MAX);
        assert_eq!(rollup.totals.profit(), Decimal::ZERO);
        assert_eq!(rollup.totals.document_count, 3);
    }

    #[test]
    fn overdue_documents_are_counted_not_listed_as_near_due() {
        let mut late = open_doc("1", dec!(100), Transaction::income());
        late.due_date = Some(date(2024, 5, 1));

        let rollup = Rollup::from_summaries(summarize(&[late]), today());
        assert_eq!(rollup.overdue_count, 1);
        assert_eq!(rollup.near_due_count, 0);
        assert!(matches!(rollup.pending[0].due, DueState::Overdue { days_overdue: 9 }));
    }
}
