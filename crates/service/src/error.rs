//! Typed error enum for the service layer.
//!
//! Unifies storage, validation and mail failures into a single error type,
//! so handlers can map each failure mode to a response.

use eventboard_core::CoreError;
use eventboard_mail::MailError;
use eventboard_storage::StorageError;
use thiserror::Error;

/// Service-layer error unifying storage, validation and mail failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (DB, not found, duplicate, etc.).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Caller provided invalid input (blank names, bad email, bad paging).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rendering or delivering mail failed.
    #[error("mail: {0}")]
    Mail(#[from] MailError),

    /// Filesystem access failed (import directory).
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed in the service layer.
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    /// Whether this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Storage(StorageError::NotFound { .. }))
    }

    /// Whether this error represents a duplicate/conflict.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_duplicate())
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
