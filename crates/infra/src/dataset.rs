//! JSON snapshot of the back-office data, loadable into an [`InMemoryStore`].

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use backoffice_invoicing::Document;
use backoffice_parties::Party;
use backoffice_products::{Product, ProductId};
use backoffice_projects::Project;

use crate::error::RepositoryError;
use crate::read_model::InMemoryStore;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub parties: Vec<Party>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl Dataset {
    pub fn from_reader(reader: impl Read) -> Result<Self, RepositoryError> {
        let mut dataset: Dataset = serde_json::from_reader(reader)?;
        dataset.resolve_prices();
        Ok(dataset)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let dataset = Self::from_reader(BufReader::new(file))?;
        tracing::info!(
            path = %path.display(),
            parties = dataset.parties.len(),
            products = dataset.products.len(),
            projects = dataset.projects.len(),
            documents = dataset.documents.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Fill unpriced line products from the catalogue.
    ///
    /// Lines whose product is unknown, or known but unpriced, are left as they
    /// are; the aggregation counts them as zero. Lines referencing a product
    /// outside its validity window on the document's issue date are kept and
    /// logged.
    pub fn resolve_prices(&mut self) {
        let catalogue: HashMap<ProductId, &Product> =
            self.products.iter().map(|p| (p.id_typed(), p)).collect();

        for document in &mut self.documents {
            for line in &mut document.lines {
                let Some(line_product) = line.product.as_mut() else {
                    continue;
                };
                let Some(product) = catalogue.get(&line_product.product_id) else {
                    tracing::warn!(
                        document = %document.number,
                        product = %line_product.product_id,
                        "line references unknown product"
                    );
                    continue;
                };

                if line_product.gross_price.is_none() {
                    line_product.gross_price = product.gross_price();
                }
                if let Some(issued) = document.issue_date {
                    if !product.is_valid_on(issued) {
                        tracing::warn!(
                            document = %document.number,
                            product = product.name(),
                            %issued,
                            "product not valid on issue date"
                        );
                    }
                }
            }
        }
    }

    pub fn into_store(self) -> Result<InMemoryStore, RepositoryError> {
        let store = InMemoryStore::new();
        for party in self.parties {
            store.upsert_party(party)?;
        }
        for product in self.products {
            store.upsert_product(product)?;
        }
        for project in self.projects {
            store.upsert_project(project)?;
        }
        for document in self.documents {
            store.upsert_document(document)?;
        }
        Ok(store)
    }
}
