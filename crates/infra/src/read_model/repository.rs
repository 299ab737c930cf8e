use std::sync::Arc;

use backoffice_invoicing::{Document, DocumentId};
use backoffice_parties::{Party, PartyId, TaxId};
use backoffice_products::{Product, ProductId};
use backoffice_projects::{Project, ProjectId};
use backoffice_reporting::DocumentQuery;

use crate::error::RepositoryError;

/// Documents matching a query, newest issue date first.
pub trait DocumentRepository: Send + Sync {
    fn document(&self, id: DocumentId) -> Result<Option<Document>, RepositoryError>;
    fn documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, RepositoryError>;
}

pub trait PartyRepository: Send + Sync {
    fn party(&self, id: PartyId) -> Result<Option<Party>, RepositoryError>;
    fn party_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Party>, RepositoryError>;
    /// Every party, disabled ones included, ordered by name.
    fn parties(&self) -> Result<Vec<Party>, RepositoryError>;

    /// Like [`party`](Self::party), but a missing party is an error.
    fn require_party(&self, id: PartyId) -> Result<Party, RepositoryError> {
        self.party(id)?
            .ok_or_else(|| RepositoryError::not_found("party", id))
    }
}

pub trait ProjectRepository: Send + Sync {
    fn project(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError>;
    fn project_by_code(&self, code: &str) -> Result<Option<Project>, RepositoryError>;
    fn projects(&self) -> Result<Vec<Project>, RepositoryError>;
}

pub trait ProductRepository: Send + Sync {
    fn product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;
    fn products(&self) -> Result<Vec<Product>, RepositoryError>;
}

impl<S> DocumentRepository for Arc<S>
where
    S: DocumentRepository + ?Sized,
{
    fn document(&self, id: DocumentId) -> Result<Option<Document>, RepositoryError> {
        (**self).document(id)
    }

    fn documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, RepositoryError> {
        (**self).documents(query)
    }
}

impl<S> PartyRepository for Arc<S>
where
    S: PartyRepository + ?Sized,
{
    fn party(&self, id: PartyId) -> Result<Option<Party>, RepositoryError> {
        (**self).party(id)
    }

    fn party_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Party>, RepositoryError> {
        (**self).party_by_tax_id(tax_id)
    }

    fn parties(&self) -> Result<Vec<Party>, RepositoryError> {
        (**self).parties()
    }
}

impl<S> ProjectRepository for Arc<S>
where
    S: ProjectRepository + ?Sized,
{
    fn project(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        (**self).project(id)
    }

    fn project_by_code(&self, code: &str) -> Result<Option<Project>, RepositoryError> {
        (**self).project_by_code(code)
    }

    fn projects(&self) -> Result<Vec<Project>, RepositoryError> {
        (**self).projects()
    }
}

impl<S> ProductRepository for Arc<S>
where
    S: ProductRepository + ?Sized,
{
    fn product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        (**self).product(id)
    }

    fn products(&self) -> Result<Vec<Product>, RepositoryError> {
        (**self).products()
    }
}
