use thiserror::Error;

/// Errors produced by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated (duplicate email).
    #[error("{0} already exists")]
    Conflict(&'static str),

    /// The record does not exist or is not owned by the caller.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The backend itself failed (connection lost, bad query, ...).
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}
