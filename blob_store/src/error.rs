//! Error types for blob store operations.

use std::fmt;

/// Result type for blob store operations.
pub type BlobResult<T> = Result<T, BlobError>;

/// Errors that can occur during blob store operations.
#[derive(Debug)]
pub enum BlobError {
    /// No object is stored under the key.
    NotFound { key: String },

    /// The object was rewritten between fetching its handle and reading its
    /// content.
    GenerationMismatch { key: String },

    /// A key segment is empty, contains the `/` delimiter or a control
    /// character.
    InvalidKey { segment: String, reason: String },

    /// Invalid storage URL.
    InvalidUri { uri: String, reason: String },

    /// Any other failure reported by the backing store.
    Store { source: object_store::Error },
}

impl BlobError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BlobError::NotFound { .. })
    }
}

impl fmt::Display for BlobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlobError::NotFound { key } => write!(f, "Object not found: {}", key),
            BlobError::GenerationMismatch { key } => {
                write!(f, "Object {} changed while it was being read", key)
            }
            BlobError::InvalidKey { segment, reason } => {
                write!(f, "Invalid key segment '{}': {}", segment, reason)
            }
            BlobError::InvalidUri { uri, reason } => {
                write!(f, "Invalid URI '{}': {}", uri, reason)
            }
            BlobError::Store { source } => write!(f, "Object store error: {}", source),
        }
    }
}

impl std::error::Error for BlobError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BlobError::Store { source } => Some(source),
            _ => None,
        }
    }
}

impl From<object_store::Error> for BlobError {
    fn from(err: object_store::Error) -> Self {
        match err {
            object_store::Error::NotFound { path, .. } => BlobError::NotFound { key: path },
            object_store::Error::Precondition { path, .. } |
            object_store::Error::NotModified { path, .. } => {
                BlobError::GenerationMismatch { key: path }
            }
            _ => BlobError::Store { source: err },
        }
    }
}
