//! Time windows and document queries.
//!
//! The query-string helpers mirror how the back-office screens read their
//! filters: anything that does not parse is dropped, never reported.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use backoffice_invoicing::Document;
use backoffice_parties::PartyId;
use backoffice_projects::ProjectId;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Year plus an optional set of months. An empty month set means the whole year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFilter {
    pub year: i32,
    #[serde(default)]
    pub months: BTreeSet<u32>,
}

impl PeriodFilter {
    pub fn year(year: i32) -> Self {
        Self {
            year,
            months: BTreeSet::new(),
        }
    }

    pub fn with_months(mut self, months: impl IntoIterator<Item = u32>) -> Self {
        self.months
            .extend(months.into_iter().filter(|m| (1..=12).contains(m)));
        self
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && (self.months.is_empty() || self.months.contains(&date.month()))
    }

    /// Build from raw query values. A missing or non-numeric year falls back to
    /// `today`'s year; non-numeric months and months outside 1..=12 are dropped.
    pub fn from_query<'a>(
        year: Option<&str>,
        months: impl IntoIterator<Item = &'a str>,
        today: NaiveDate,
    ) -> Self {
        let year = match year.map(str::trim).filter(|y| !y.is_empty()) {
            Some(raw) => match parse_digits::<i32>(raw) {
                Some(y) => y,
                None => {
                    tracing::warn!(value = raw, "discarding invalid year filter");
                    today.year()
                }
            },
            None => today.year(),
        };

        let mut parsed = BTreeSet::new();
        for raw in months {
            match parse_digits::<u32>(raw.trim()) {
                Some(m) if (1..=12).contains(&m) => {
                    parsed.insert(m);
                }
                _ => tracing::warn!(value = raw, "discarding invalid month filter"),
            }
        }

        Self {
            year,
            months: parsed,
        }
    }
}

fn parse_digits<T: std::str::FromStr>(raw: &str) -> Option<T> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Inclusive date range; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    /// Parse `YYYY-MM-DD` bounds; malformed bounds are left open.
    pub fn from_query(from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            from: from.and_then(parse_date),
            to: to.and_then(parse_date),
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            tracing::warn!(value = raw, "discarding invalid date filter");
            None
        }
    }
}

/// Selection criteria for documents.
///
/// Date filters only ever match documents that have an issue date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentQuery {
    #[serde(default)]
    pub party_id: Option<PartyId>,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub issued: DateRange,
    #[serde(default)]
    pub period: Option<PeriodFilter>,
    #[serde(default)]
    pub exclude_void: bool,
}

impl DocumentQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_party(party_id: PartyId) -> Self {
        Self {
            party_id: Some(party_id),
            ..Self::default()
        }
    }

    pub fn for_project(project_id: ProjectId) -> Self {
        Self {
            project_id: Some(project_id),
            ..Self::default()
        }
    }

    pub fn issued_within(mut self, range: DateRange) -> Self {
        self.issued = range;
        self
    }

    pub fn in_period(mut self, period: PeriodFilter) -> Self {
        self.period = Some(period);
        self
    }

    pub fn without_void(mut self) -> Self {
        self.exclude_void = true;
        self
    }

    pub fn matches(&self, document: &Document) -> bool {
        if self.exclude_void && document.is_void() {
            return false;
        }
        if self.party_id.is_some() && document.party_id != self.party_id {
            return false;
        }
        if self.project_id.is_some() && document.project_id != self.project_id {
            return false;
        }

        let needs_date = !self.issued.is_unbounded() || self.period.is_some();
        if !needs_date {
            return true;
        }
        let Some(issued) = document.issue_date else {
            return false;
        };

        self.issued.contains(issued) && self.period.as_ref().is_none_or(|p| p.contains(issued))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_invoicing::{DocumentId, DocumentStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn period_membership_by_month() {
        let issued = date(2024, 4, 15);
        assert!(PeriodFilter::year(2024).with_months([4]).contains(issued));
        assert!(!PeriodFilter::year(2024).with_months([5]).contains(issued));
        assert!(PeriodFilter::year(2024).contains(issued));
        assert!(!PeriodFilter::year(2023).contains(issued));
    }

    #[test]
    fn query_parsing_drops_invalid_months() {
        let today = date(2025, 2, 1);
        let period = PeriodFilter::from_query(Some("2024"), ["4", "13", "0", "x", " 12 "], today);
        assert_eq!(period.year, 2024);
        assert_eq!(period.months.into_iter().collect::<Vec<_>>(), vec![4, 12]);
    }

    #[test]
    fn query_year_defaults_to_today() {
        let today = date(2025, 2, 1);
        assert_eq!(PeriodFilter::from_query(None, [], today).year, 2025);
        assert_eq!(PeriodFilter::from_query(Some("-2024"), [], today).year, 2025);
        assert_eq!(PeriodFilter::from_query(Some("abc"), [], today).year, 2025);
    }

    #[test]
    fn date_range_is_inclusive_and_tolerant() {
        let range = DateRange::from_query(Some("2024-01-01"), Some("2024-01-31"));
        assert!(range.contains(date(2024, 1, 1)));
        assert!(range.contains(date(2024, 1, 31)));
        assert!(!range.contains(date(2024, 2, 1)));

        let open = DateRange::from_query(Some("01/01/2024"), None);
        assert!(open.is_unbounded());
    }

    #[test]
    fn query_matches_party_dates_and_void() {
        let party = PartyId::generate();
        let mut doc = Document::new(DocumentId::generate(), "7", DocumentStatus::Void);
        doc.party_id = Some(party);
        doc.issue_date = Some(date(2024, 4, 15));

        let query = DocumentQuery::for_party(party).in_period(PeriodFilter::year(2024).with_months([4]));
        assert!(query.matches(&doc));
        assert!(!query.clone().without_void().matches(&doc));
        assert!(!DocumentQuery::for_party(PartyId::generate()).matches(&doc));

        doc.issue_date = None;
        assert!(!query.matches(&doc));
        assert!(DocumentQuery::for_party(party).matches(&doc));
    }
}
