use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, typed_id};

typed_id!(
    /// Transaction identifier.
    TransactionId
);

/// Direction of money for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" | "INGRESO" => Ok(TransactionKind::Income),
            "EXPENSE" | "EGRESO" => Ok(TransactionKind::Expense),
            other => Err(DomainError::validation(format!(
                "unknown transaction kind: {other:?}"
            ))),
        }
    }
}

/// Money movement recorded against a document.
///
/// The type tag comes from a lookup table maintained elsewhere, so it may be
/// missing or hold a label this module does not recognize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(default)]
    pub tag: Option<String>,
}

impl Transaction {
    pub fn new(id: TransactionId, tag: impl Into<String>) -> Self {
        Self {
            id,
            tag: Some(tag.into()),
        }
    }

    pub fn income() -> Self {
        Self::new(TransactionId::generate(), TransactionKind::Income.as_str())
    }

    pub fn expense() -> Self {
        Self::new(TransactionId::generate(), TransactionKind::Expense.as_str())
    }

    /// Resolved kind; `None` for absent or unrecognized tags.
    pub fn kind(&self) -> Option<TransactionKind> {
        self.tag.as_deref().and_then(|t| t.parse().ok())
    }
}
