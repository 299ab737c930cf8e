//! Products and services catalogue.
//!
//! Line items price themselves off the gross (tax-inclusive) unit price kept
//! here.

pub mod product;

pub use product::{Product, ProductId, ProductKind};
