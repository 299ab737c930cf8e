//! Reporting error types.

use thiserror::Error;

/// Raised only by the strict aggregation path; the lenient path never fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AggregationError {
    /// A line has no product, or its product carries no price.
    #[error("document {document}: line {line} has no priced product")]
    MissingPrice { document: String, line: usize },
    #[error("document {document}: line {line} amount is too large to total")]
    AmountOverflow { document: String, line: usize },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to encode report: {0}")]
    Encode(#[from] csv::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
