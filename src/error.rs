use thiserror::Error;

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Failures surfaced by catalog mutations and queries
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Requested row does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Malformed input: bad rating, wrong field count, unknown category...
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Any relational failure. Open transactions are rolled back on drop.
    #[error(transparent)]
    Store(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
