//! Storage error types.

use sitegraph_domain::DomainError;
use thiserror::Error;

/// Storage-specific errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Authorizable or node not found.
    #[error("entity not found: {id}")]
    EntityNotFound { id: String },

    /// An entity with the same id (or node with the same path) already exists.
    #[error("duplicate entity: {id}")]
    DuplicateEntity { id: String },

    /// Invalid input error.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Fixture file could not be read.
    #[error("failed to read fixture {path}: {message}")]
    IoError { path: String, message: String },

    /// Serialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },

    /// Internal error.
    #[error("internal storage error: {message}")]
    InternalError { message: String },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::SerializationError {
            message: err.to_string(),
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        let message = err.to_string();
        match err {
            StorageError::EntityNotFound { id } => DomainError::NotFound { id },
            StorageError::DuplicateEntity { .. } => DomainError::Conflict { message },
            StorageError::InvalidInput { message } => DomainError::InvalidArgument { message },
            StorageError::IoError { .. } | StorageError::SerializationError { .. } => {
                DomainError::StoreUnavailable { message }
            }
            StorageError::InternalError { message } => DomainError::Internal { message },
        }
    }
}
