use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0} store lock poisoned")]
    Poisoned(&'static str),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("failed to decode dataset: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
