//! Store error types

use thiserror::Error;

/// Errors that can occur in the file-backed store
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Caller supplied an invalid or incomplete document
    #[error("{0}")]
    Validation(String),

    /// Another dashboard already uses this slug (case-insensitive)
    #[error("Slug already exists: {0}")]
    DuplicateSlug(String),

    #[error("Dashboard not found: {0}")]
    DashboardNotFound(String),

    #[error("Link not found: {0}")]
    LinkNotFound(String),

    /// An export archive could not be written or read
    #[error("Archive error: {0}")]
    Archive(String),
}

impl From<zip::result::ZipError> for StoreError {
    fn from(err: zip::result::ZipError) -> Self {
        StoreError::Archive(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
