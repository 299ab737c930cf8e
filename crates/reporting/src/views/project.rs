use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use backoffice_invoicing::Document;
use backoffice_projects::{Project, ProjectId, ProjectStatus};

use crate::aggregate::summarize_document;
use crate::config::ReportContext;
use crate::filter::DocumentQuery;
use crate::money::round_currency;
use crate::rollup::{Rollup, Totals};

/// Money figures for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub project_id: ProjectId,
    pub code: String,
    pub description: String,
    pub status: ProjectStatus,
    pub cost: Decimal,
    pub income: Decimal,
    pub expense: Decimal,
    /// cost + income − expense.
    pub profit: Decimal,
    /// Budget left: cost − expense.
    pub remaining: Decimal,
    /// Remaining budget as a whole percentage of cost, clamped to 0..=100.
    pub remaining_percent: u8,
    pub document_count: usize,
}

impl ProjectSummary {
    fn new(project: &Project, totals: &Totals) -> Self {
        let cost = project.cost_or_zero();
        let income = totals.total_income;
        let expense = totals.total_expense;
        let remaining = cost.saturating_sub(expense);

        Self {
            project_id: project.id_typed(),
            code: project.code().to_string(),
            description: project.description().to_string(),
            status: project.status(),
            cost: round_currency(cost),
            income: round_currency(income),
            expense: round_currency(expense),
            profit: round_currency(cost.saturating_add(income).saturating_sub(expense)),
            remaining: round_currency(remaining),
            remaining_percent: remaining_percent(remaining, cost),
            document_count: totals.document_count,
        }
    }
}

fn remaining_percent(remaining: Decimal, cost: Decimal) -> u8 {
    if cost <= Decimal::ZERO {
        return 0;
    }
    let saturated = if remaining.is_sign_negative() {
        Decimal::ZERO
    } else {
        Decimal::ONE_HUNDRED
    };
    let percent = remaining
        .checked_div(cost)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(saturated, |p| p.trunc());
    percent
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .to_u8()
        .unwrap_or(0)
}

fn project_totals(project: &Project, documents: &[Document], ctx: &ReportContext) -> Totals {
    let query = DocumentQuery::for_project(project.id_typed());
    let summaries = documents
        .iter()
        .filter(|d| query.matches(d))
        .map(|d| summarize_document(d, ctx));
    Rollup::from_summaries(summaries, ctx.today).totals
}

pub fn project_summary(project: &Project, documents: &[Document], ctx: &ReportContext) -> ProjectSummary {
    ProjectSummary::new(project, &project_totals(project, documents, ctx))
}

/// All projects with their figures and the sums across them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectOverview {
    pub projects: Vec<ProjectSummary>,
    pub total_profit: Decimal,
    pub total_expense: Decimal,
}

/// Projects keep the order they were given in.
pub fn project_overview(projects: &[Project], documents: &[Document], ctx: &ReportContext) -> ProjectOverview {
    let mut total_profit = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;

    let summaries = projects
        .iter()
        .map(|project| {
            let totals = project_totals(project, documents, ctx);
            total_profit = total_profit
                .saturating_add(project.cost_or_zero())
                .saturating_add(totals.profit());
            total_expense = total_expense.saturating_add(totals.total_expense);
            ProjectSummary::new(project, &totals)
        })
        .collect();

    ProjectOverview {
        projects: summaries,
        total_profit: round_currency(total_profit),
        total_expense: round_currency(total_expense),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn remaining_percent_truncates_and_clamps() {
        assert_eq!(remaining_percent(dec!(333), dec!(1000)), 33);
        assert_eq!(remaining_percent(dec!(999.9), dec!(1000)), 99);
        assert_eq!(remaining_percent(dec!(-50), dec!(1000)), 0);
        assert_eq!(remaining_percent(dec!(1000), dec!(1000)), 100);
        assert_eq!(remaining_percent(dec!(10), Decimal::ZERO), 0);
    }

    #[test]
    fn remaining_percent_clamps_ratios_too_large_to_compute() {
        assert_eq!(remaining_percent(Decimal::MAX, dec!(0.5)), 100);
        assert_eq!(remaining_percent(Decimal::MIN, dec!(0.5)), 0);
    }
}
