//! Export contract: a [`DebtReport`] goes in, a byte stream comes out.
//!
//! Spreadsheet and PDF writers live outside this crate and implement
//! [`ReportRenderer`]; [`CsvRenderer`] is the one shipped here.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ReportError;
use crate::money::format_amount;
use crate::views::DebtReport;

pub trait ReportRenderer {
    /// MIME type for the response carrying the rendered bytes.
    fn content_type(&self) -> &'static str;

    fn file_extension(&self) -> &'static str;

    fn render(&self, report: &DebtReport) -> Result<Vec<u8>, ReportError>;
}

/// `reporte_<party>.<ext>`, with characters unsafe in a header or path
/// replaced by `_`.
pub fn attachment_file_name(party_name: &str, renderer: &dyn ReportRenderer) -> String {
    let name: String = party_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let name = if name.is_empty() { "sin_nombre" } else { name.as_str() };
    format!("reporte_{name}.{}", renderer.file_extension())
}

const HEADERS: [&str; 11] = [
    "Doc",
    "Issued",
    "Due",
    "Kind",
    "Status",
    "Net",
    "Tax",
    "Gross",
    "Paid",
    "Outstanding",
    "Days overdue",
];

/// Comma-separated output: a short header block with the title, the party and
/// its formatted balances, then one record per report row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer {
    delimiter: Option<u8>,
}

impl CsvRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `;` or another single-byte delimiter, as spreadsheet locales
    /// with decimal commas expect.
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter: Some(delimiter),
        }
    }
}

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

fn amount_cell(amount: Decimal) -> String {
    amount.trunc().to_string()
}

impl ReportRenderer for CsvRenderer {
    fn content_type(&self) -> &'static str {
        "text/csv; charset=utf-8"
    }

    fn file_extension(&self) -> &'static str {
        "csv"
    }

    fn render(&self, report: &DebtReport) -> Result<Vec<u8>, ReportError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .delimiter(self.delimiter.unwrap_or(b','))
            .from_writer(Vec::new());

        writer.write_record(["Debt report"])?;
        writer.write_record([
            "Party",
            report.party_name.as_str(),
            "Tax ID",
            report.tax_id.as_deref().unwrap_or(""),
        ])?;
        writer.write_record([
            "Balance in favor".to_string(),
            format_amount(report.balance_in_favor),
            "Balance against".to_string(),
            format_amount(report.balance_against),
        ])?;
        writer.write_record(HEADERS)?;

        for row in &report.rows {
            writer.write_record([
                row.document.clone(),
                date_cell(row.issue_date),
                date_cell(row.due_date),
                row.kind.map(|k| k.as_str().to_string()).unwrap_or_default(),
                row.status.as_str().to_string(),
                amount_cell(row.net),
                amount_cell(row.tax),
                amount_cell(row.gross),
                amount_cell(row.paid),
                amount_cell(row.outstanding),
                row.days_overdue.map(|d| d.to_string()).unwrap_or_default(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ReportError::Io(e.into_error()))?;
        tracing::debug!(
            party = %report.party_name,
            rows = report.rows.len(),
            bytes = bytes.len(),
            "rendered csv report"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_invoicing::{DocumentStatus, TransactionKind};
    use backoffice_parties::PartyId;
    use rust_decimal_macros::dec;

    use crate::views::ReportRow;

    fn report() -> DebtReport {
        DebtReport {
            party_id: PartyId::generate(),
            party_name: "Constructora Sur".to_string(),
            tax_id: Some("12.345.678-5".to_string()),
            generated_on: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            balance_in_favor: dec!(11900),
            balance_against: Decimal::ZERO,
            rows: vec![ReportRow {
                document: "F-101".to_string(),
                issue_date: NaiveDate::from_ymd_opt(2024, 4, 1),
                due_date: NaiveDate::from_ymd_opt(2024, 4, 30),
                kind: Some(TransactionKind::Income),
                status: DocumentStatus::Pending,
                net: dec!(10000),
                tax: dec!(1900),
                gross: dec!(11900),
                paid: Decimal::ZERO,
                outstanding: dec!(11900),
                days_overdue: Some(10),
            }],
        }
    }

    #[test]
    fn csv_contains_header_block_and_rows() {
        let bytes = CsvRenderer::new().render(&report()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Debt report");
        assert_eq!(lines[1], "Party,Constructora Sur,Tax ID,12.345.678-5");
        assert_eq!(lines[2], "Balance in favor,$11.900,Balance against,$0");
        assert!(lines[3].starts_with("Doc,Issued,Due"));
        assert_eq!(
            lines[4],
            "F-101,01/04/2024,30/04/2024,INCOME,PENDING,10000,1900,11900,0,11900,10"
        );
    }

    #[test]
    fn custom_delimiter() {
        let bytes = CsvRenderer::with_delimiter(b';').render(&report()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("Party;Constructora Sur;Tax ID;12.345.678-5"));
    }

    #[test]
    fn file_name_uses_party_and_extension() {
        let renderer = CsvRenderer::new();
        assert_eq!(
            attachment_file_name("Constructora Sur", &renderer),
            "reporte_Constructora_Sur.csv"
        );
        assert_eq!(attachment_file_name("  ", &renderer), "reporte_sin_nombre.csv");
        assert_eq!(renderer.content_type(), "text/csv; charset=utf-8");
    }
}
