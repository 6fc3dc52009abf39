//! Domain error types for membership operations.

use thiserror::Error;

/// Domain-specific errors for membership operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An authorizable or content node id does not resolve.
    #[error("not found: {id}")]
    NotFound { id: String },

    /// No profile record exists for a user.
    #[error("profile not found for user: {user_id}")]
    ProfileNotFound { user_id: String },

    /// Entity or profile store call failed.
    #[error("store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// Request rejected because an argument is malformed or of the wrong kind.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Join/unjoin precondition violated.
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// Unexpected internal failure.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// HTTP status a transport layer should answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            DomainError::NotFound { .. } | DomainError::ProfileNotFound { .. } => 404,
            DomainError::InvalidArgument { .. } => 400,
            DomainError::Conflict { .. } => 409,
            DomainError::StoreUnavailable { .. } => 503,
            DomainError::Internal { .. } => 500,
        }
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        DomainError::Conflict {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        DomainError::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
