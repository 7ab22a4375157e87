// common/src/error.rs
use thiserror::Error;

/// Failures reported by the identity client seam
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The user aborted the interactive flow; not treated as a failure
    #[error("user interrupted the authentication flow")]
    UserInterrupt,
    #[error("identity provider rejected the login: {0}")]
    Rejected(String),
    #[error("identity client unavailable: {0}")]
    Unavailable(String),
    #[error("invalid delegation: {0}")]
    Delegation(String),
}

impl From<jsonwebtoken::errors::Error> for IdentityError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        IdentityError::Delegation(err.to_string())
    }
}

impl From<StorageError> for IdentityError {
    fn from(err: StorageError) -> Self {
        IdentityError::Unavailable(err.to_string())
    }
}

/// Failures from the backend catalog source
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("catalog backend unavailable: {0}")]
    Unavailable(String),
    #[error("listing {0} not found")]
    NotFound(String),
}

/// Failures from a key-value storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}
