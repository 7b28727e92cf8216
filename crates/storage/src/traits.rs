//! Storage trait for student documents.

use async_trait::async_trait;
use student_records_core::{NewStudent, Student, StudentQuery};

use crate::error::StorageError;

/// Document-store operations the service layer depends on.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Filtered, sorted and paginated records.
    async fn find(&self, query: &StudentQuery) -> Result<Vec<Student>, StorageError>;

    /// Get record by ID.
    async fn find_by_id(&self, id: &str) -> Result<Option<Student>, StorageError>;

    /// Insert a new document; both timestamps are set to now.
    async fn insert(&self, input: &NewStudent) -> Result<Student, StorageError>;

    /// Patch provided fields and bump `updatedAt`. `None` if the id is unknown.
    async fn update_by_id(
        &self,
        id: &str,
        input: &NewStudent,
    ) -> Result<Option<Student>, StorageError>;

    /// Returns `true` if a record was removed.
    async fn delete_by_id(&self, id: &str) -> Result<bool, StorageError>;

    /// Total number of stored records.
    async fn count(&self) -> Result<usize, StorageError>;

    async fn health_check(&self) -> Result<(), StorageError>;

    /// Release connections. Later operations fail with [`StorageError::Closed`].
    async fn close(&self);
}
