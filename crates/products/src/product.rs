use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, DomainResult, Entity, typed_id};

typed_id!(
    /// Product/service identifier.
    ProductId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Product,
    Service,
}

/// Catalogue entry.
///
/// `gross_price` is tax-inclusive and may be missing on legacy records; the
/// aggregation layer treats a missing price as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    kind: ProductKind,
    gross_price: Option<Decimal>,
    /// First day documents may reference this product.
    #[serde(default)]
    valid_from: Option<NaiveDate>,
    /// Last day documents may reference this product.
    #[serde(default)]
    valid_until: Option<NaiveDate>,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        kind: ProductKind,
        gross_price: Option<Decimal>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if gross_price.is_some_and(|p| p.is_sign_negative()) {
            return Err(DomainError::validation("gross price cannot be negative"));
        }

        Ok(Self {
            id,
            name,
            kind,
            gross_price,
            valid_from: None,
            valid_until: None,
        })
    }

    /// Restrict the dates on which documents may use this product.
    pub fn with_validity(
        mut self,
        valid_from: Option<NaiveDate>,
        valid_until: Option<NaiveDate>,
    ) -> DomainResult<Self> {
        if let (Some(from), Some(until)) = (valid_from, valid_until) {
            if from > until {
                return Err(DomainError::validation(format!(
                    "validity window is inverted ({from} > {until})"
                )));
            }
        }
        self.valid_from = valid_from;
        self.valid_until = valid_until;
        Ok(self)
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ProductKind {
        self.kind
    }

    pub fn gross_price(&self) -> Option<Decimal> {
        self.gross_price
    }

    pub fn valid_from(&self) -> Option<NaiveDate> {
        self.valid_from
    }

    pub fn valid_until(&self) -> Option<NaiveDate> {
        self.valid_until
    }

    /// Whether a document dated `date` may reference this product.
    /// Open-ended bounds always pass.
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.valid_from.is_none_or(|from| date >= from)
            && self.valid_until.is_none_or(|until| date <= until)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
