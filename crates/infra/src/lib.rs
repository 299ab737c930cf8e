//! Infrastructure layer: read-side storage for the reporting views.
//!
//! Persistence proper lives elsewhere; this crate defines the read interface
//! the views are fed through and an in-memory implementation loadable from a
//! JSON dataset.

pub mod dataset;
pub mod error;
pub mod read_model;

pub use dataset::Dataset;
pub use error::RepositoryError;
pub use read_model::{
    DocumentRepository, InMemoryStore, PartyRepository, ProductRepository, ProjectRepository,
};
