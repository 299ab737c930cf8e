use core::fmt;
use core::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, Entity, typed_id};
use backoffice_parties::PartyId;
use backoffice_products::{Product, ProductId};
use backoffice_projects::ProjectId;

use crate::transaction::Transaction;

typed_id!(
    /// Document identifier.
    DocumentId
);

/// Payment status of a document.
///
/// Accepts both the English labels and the Spanish ones still found in older
/// records (`PENDIENTE`, `MITAD`, `PAGADO`, `ANULADO`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DocumentStatus {
    Pending,
    HalfPaid,
    Paid,
    Void,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Pending => "PENDING",
            DocumentStatus::HalfPaid => "HALF-PAID",
            DocumentStatus::Paid => "PAID",
            DocumentStatus::Void => "VOID",
        }
    }

    /// Still awaiting (some) payment.
    pub fn is_pending(self) -> bool {
        matches!(self, DocumentStatus::Pending | DocumentStatus::HalfPaid)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" | "PENDIENTE" => Ok(DocumentStatus::Pending),
            "HALF-PAID" | "HALF_PAID" | "MITAD" => Ok(DocumentStatus::HalfPaid),
            "PAID" | "PAGADO" => Ok(DocumentStatus::Paid),
            "VOID" | "ANULADO" => Ok(DocumentStatus::Void),
            other => Err(DomainError::validation(format!(
                "unknown document status: {other:?}"
            ))),
        }
    }
}

impl TryFrom<String> for DocumentStatus {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DocumentStatus> for String {
    fn from(value: DocumentStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Product reference as seen from a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineProduct {
    pub product_id: ProductId,
    /// Gross (tax-inclusive) unit price at the time the line was read.
    #[serde(default)]
    pub gross_price: Option<Decimal>,
}

impl From<&Product> for LineProduct {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id_typed(),
            gross_price: product.gross_price(),
        }
    }
}

/// Document line. Every numeric field may be missing on legacy rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub product: Option<LineProduct>,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub quantity_paid: Option<Decimal>,
}

impl LineItem {
    pub fn new(product: &Product, quantity: Decimal, quantity_paid: Decimal) -> Self {
        Self {
            product: Some(LineProduct::from(product)),
            quantity: Some(quantity),
            quantity_paid: Some(quantity_paid),
        }
    }

    /// `None` when there is no product or the product has no price.
    pub fn unit_price(&self) -> Option<Decimal> {
        self.product.as_ref().and_then(|p| p.gross_price)
    }

    pub fn is_priced(&self) -> bool {
        self.unit_price().is_some()
    }

    /// quantity × unit price, with missing values counted as zero.
    /// `None` when the product does not fit in a `Decimal`.
    pub fn checked_total(&self) -> Option<Decimal> {
        self.quantity
            .unwrap_or_default()
            .checked_mul(self.unit_price().unwrap_or_default())
    }

    /// quantity paid × unit price, same rules as [`LineItem::checked_total`].
    pub fn checked_paid(&self) -> Option<Decimal> {
        self.quantity_paid
            .unwrap_or_default()
            .checked_mul(self.unit_price().unwrap_or_default())
    }
}

/// Invoice-like document (invoice, receipt, credit note...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// Human-facing number printed on the document.
    pub number: String,
    /// Document type label, e.g. "Factura" or "Boleta".
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub party_id: Option<PartyId>,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub status: DocumentStatus,
    #[serde(default)]
    pub lines: Vec<LineItem>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Document {
    pub fn new(id: DocumentId, number: impl Into<String>, status: DocumentStatus) -> Self {
        Self {
            id,
            number: number.into(),
            doc_type: None,
            party_id: None,
            project_id: None,
            issue_date: None,
            due_date: None,
            status,
            lines: Vec::new(),
            transactions: Vec::new(),
        }
    }

    pub fn is_void(&self) -> bool {
        self.status == DocumentStatus::Void
    }
}

impl Entity for Document {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_products::ProductKind;
    use rust_decimal_macros::dec;

    fn priced(price: Option<Decimal>) -> Product {
        Product::new(ProductId::generate(), "Item", ProductKind::Product, price).unwrap()
    }

    #[test]
    fn status_parses_legacy_and_english_labels() {
        assert_eq!("pendiente".parse::<DocumentStatus>().unwrap(), DocumentStatus::Pending);
        assert_eq!("MITAD".parse::<DocumentStatus>().unwrap(), DocumentStatus::HalfPaid);
        assert_eq!("half_paid".parse::<DocumentStatus>().unwrap(), DocumentStatus::HalfPaid);
        assert_eq!("Anulado".parse::<DocumentStatus>().unwrap(), DocumentStatus::Void);
        assert!("ARCHIVED".parse::<DocumentStatus>().is_err());
    }

    #[test]
    fn only_pending_and_half_paid_are_pending() {
        assert!(DocumentStatus::Pending.is_pending());
        assert!(DocumentStatus::HalfPaid.is_pending());
        assert!(!DocumentStatus::Paid.is_pending());
        assert!(!DocumentStatus::Void.is_pending());
    }

    #[test]
    fn line_totals_use_gross_unit_price() {
        let line = LineItem::new(&priced(Some(dec!(1190))), dec!(3), dec!(1));
        assert_eq!(line.checked_total(), Some(dec!(3570)));
        assert_eq!(line.checked_paid(), Some(dec!(1190)));
    }

    #[test]
    fn missing_values_count_as_zero() {
        let no_product = LineItem {
            product: None,
            quantity: Some(dec!(5)),
            quantity_paid: Some(dec!(5)),
        };
        assert_eq!(no_product.checked_total(), Some(Decimal::ZERO));
        assert!(!no_product.is_priced());

        let no_price = LineItem::new(&priced(None), dec!(2), dec!(0));
        assert_eq!(no_price.checked_total(), Some(Decimal::ZERO));

        let no_quantity = LineItem {
            quantity: None,
            ..LineItem::new(&priced(Some(dec!(100))), dec!(0), dec!(0))
        };
        assert_eq!(no_quantity.checked_total(), Some(Decimal::ZERO));
        assert!(no_quantity.is_priced());
    }

    #[test]
    fn oversized_amounts_are_reported_not_panicked() {
        let line = LineItem::new(&priced(Some(Decimal::MAX)), dec!(2), dec!(1));
        assert_eq!(line.checked_total(), None);
        assert_eq!(line.checked_paid(), Some(Decimal::MAX));
    }

    #[test]
    fn documents_deserialize_with_sparse_fields() {
        let json = format!(
            r#"{{"id":"{}","number":"F-101","status":"PENDIENTE","lines":[{{}}]}}"#,
            DocumentId::generate()
        );
        let doc: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(doc.status, DocumentStatus::Pending);
        assert_eq!(doc.lines.len(), 1);
        assert_eq!(doc.lines[0].checked_total(), Some(Decimal::ZERO));
        assert!(doc.transactions.is_empty());
    }
}
