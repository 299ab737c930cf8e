//! Read model storage abstractions.

pub mod in_memory;
pub mod repository;

pub use in_memory::InMemoryStore;
pub use repository::{DocumentRepository, PartyRepository, ProductRepository, ProjectRepository};
