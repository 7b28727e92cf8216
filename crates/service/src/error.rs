//! Typed error enum for the service layer.

use student_records_core::CoreError;
use student_records_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Caller provided invalid input (missing field, unknown sort field).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No record with this id.
    #[error("student not found: {id}")]
    NotFound { id: String },
}

impl ServiceError {
    /// Whether this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput(msg) => Self::InvalidInput(msg),
            other @ CoreError::InvalidSortField(_) => Self::InvalidInput(other.to_string()),
        }
    }
}
