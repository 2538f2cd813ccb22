use thiserror::Error;

/// Errors surfaced by the catalog store.
///
/// Reads through [`crate::Catalog`] never return these; they degrade to empty
/// results. Writes propagate them so callers can show the cause.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}
