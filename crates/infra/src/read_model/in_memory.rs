use std::cmp::Reverse;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use backoffice_core::{AggregateRoot, Entity};
use backoffice_invoicing::{Document, DocumentId};
use backoffice_parties::{Party, PartyId, TaxId};
use backoffice_products::{Product, ProductId};
use backoffice_projects::{Project, ProjectId};
use backoffice_reporting::DocumentQuery;

use crate::error::RepositoryError;
use crate::read_model::repository::{
    DocumentRepository, PartyRepository, ProductRepository, ProjectRepository,
};

/// In-memory store backing all four repositories, for tests and the CLI.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: RwLock<HashMap<DocumentId, Document>>,
    parties: RwLock<HashMap<PartyId, Party>>,
    projects: RwLock<HashMap<ProjectId, Project>>,
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_document(&self, document: Document) -> Result<(), RepositoryError> {
        insert(&self.documents, "document", *document.id(), document)
    }

    pub fn upsert_party(&self, party: Party) -> Result<(), RepositoryError> {
        insert(&self.parties, "party", *AggregateRoot::id(&party), party)
    }

    pub fn upsert_project(&self, project: Project) -> Result<(), RepositoryError> {
        insert(&self.projects, "project", *project.id(), project)
    }

    pub fn upsert_product(&self, product: Product) -> Result<(), RepositoryError> {
        insert(&self.products, "product", *product.id(), product)
    }
}

fn insert<K: Eq + Hash, V>(
    lock: &RwLock<HashMap<K, V>>,
    name: &'static str,
    key: K,
    value: V,
) -> Result<(), RepositoryError> {
    let mut map = lock.write().map_err(|_| RepositoryError::Poisoned(name))?;
    map.insert(key, value);
    Ok(())
}

impl DocumentRepository for InMemoryStore {
    fn document(&self, id: DocumentId) -> Result<Option<Document>, RepositoryError> {
        let map = self
            .documents
            .read()
            .map_err(|_| RepositoryError::Poisoned("document"))?;
        Ok(map.get(&id).cloned())
    }

    fn documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, RepositoryError> {
        let map = self
            .documents
            .read()
            .map_err(|_| RepositoryError::Poisoned("document"))?;

        let mut docs: Vec<Document> = map.values().filter(|d| query.matches(d)).cloned().collect();
        docs.sort_by(|a, b| {
            Reverse(a.issue_date)
                .cmp(&Reverse(b.issue_date))
                .then_with(|| b.number.cmp(&a.number))
        });
        Ok(docs)
    }
}

impl PartyRepository for InMemoryStore {
    fn party(&self, id: PartyId) -> Result<Option<Party>, RepositoryError> {
        let map = self
            .parties
            .read()
            .map_err(|_| RepositoryError::Poisoned("party"))?;
        Ok(map.get(&id).cloned())
    }

    fn party_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Party>, RepositoryError> {
        let map = self
            .parties
            .read()
            .map_err(|_| RepositoryError::Poisoned("party"))?;
        Ok(map.values().find(|p| p.tax_id() == Some(tax_id)).cloned())
    }

    fn parties(&self) -> Result<Vec<Party>, RepositoryError> {
        let map = self
            .parties
            .read()
            .map_err(|_| RepositoryError::Poisoned("party"))?;
        let mut parties: Vec<Party> = map.values().cloned().collect();
        parties.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(parties)
    }
}

impl ProjectRepository for InMemoryStore {
    fn project(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        let map = self
            .projects
            .read()
            .map_err(|_| RepositoryError::Poisoned("project"))?;
        Ok(map.get(&id).cloned())
    }

    fn project_by_code(&self, code: &str) -> Result<Option<Project>, RepositoryError> {
        let map = self
            .projects
            .read()
            .map_err(|_| RepositoryError::Poisoned("project"))?;
        Ok(map.values().find(|p| p.code().eq_ignore_ascii_case(code.trim())).cloned())
    }

    /// Ordered by code.
    fn projects(&self) -> Result<Vec<Project>, RepositoryError> {
        let map = self
            .projects
            .read()
            .map_err(|_| RepositoryError::Poisoned("project"))?;
        let mut projects: Vec<Project> = map.values().cloned().collect();
        projects.sort_by(|a, b| a.code().cmp(b.code()));
        Ok(projects)
    }
}

impl ProductRepository for InMemoryStore {
    fn product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let map = self
            .products
            .read()
            .map_err(|_| RepositoryError::Poisoned("product"))?;
        Ok(map.get(&id).cloned())
    }

    fn products(&self) -> Result<Vec<Product>, RepositoryError> {
        let map = self
            .products
            .read()
            .map_err(|_| RepositoryError::Poisoned("product"))?;
        let mut products: Vec<Product> = map.values().cloned().collect();
        products.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(products)
    }
}
