use std::sync::Arc;

use student_records_core::{
    NewStudent, QueryLimits, STUDENT_DELETED_MESSAGE, SearchRequest, Student, StudentQuery,
    timestamp,
};
use student_records_storage::{StorageBackend, StudentStore};

use crate::ServiceError;

/// CRUD and search over student records.
#[derive(Debug, Clone)]
pub struct StudentService {
    storage: Arc<StorageBackend>,
    limits: QueryLimits,
}

impl StudentService {
    #[must_use]
    pub fn new(storage: Arc<StorageBackend>, limits: QueryLimits) -> Self {
        Self { storage, limits }
    }

    #[must_use]
    pub fn storage(&self) -> &StorageBackend {
        &self.storage
    }

    /// Filtered, sorted page of records. Defaults: name, asc, 50, offset 0.
    pub async fn list_students(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<Student>, ServiceError> {
        let query = StudentQuery::from_request(request, self.limits);
        tracing::debug!(
            term = ?query.filter.term(),
            sort_by = %query.sort.field,
            sort_order = %query.sort.order,
            limit = query.page.limit,
            offset = query.page.offset,
            "listing students"
        );
        Ok(self.storage.find(&query).await?)
    }

    pub async fn get_student(&self, id: &str) -> Result<Option<Student>, ServiceError> {
        Ok(self.storage.find_by_id(id).await?)
    }

    pub async fn create_student(&self, input: &NewStudent) -> Result<Student, ServiceError> {
        input.validate_for_create()?;
        let student = self.storage.insert(input).await?;
        tracing::info!(
            id = %student.id,
            created_at = %timestamp::to_iso(&student.created_at),
            "Student created"
        );
        Ok(student)
    }

    /// Overwrites the provided fields, keeps `createdAt` and bumps `updatedAt`.
    pub async fn update_student(
        &self,
        id: &str,
        input: &NewStudent,
    ) -> Result<Student, ServiceError> {
        input.validate_for_update()?;
        let student = self
            .storage
            .update_by_id(id, input)
            .await?
            .ok_or_else(|| ServiceError::NotFound { id: id.to_owned() })?;
        tracing::info!(
            id = %student.id,
            created_at = %timestamp::to_iso(&student.created_at),
            updated_at = %timestamp::to_iso(&student.updated_at),
            "Student updated"
        );
        Ok(student)
    }

    pub async fn delete_student(&self, id: &str) -> Result<String, ServiceError> {
        if !self.storage.delete_by_id(id).await? {
            return Err(ServiceError::NotFound { id: id.to_owned() });
        }
        tracing::info!(%id, "Student deleted");
        Ok(STUDENT_DELETED_MESSAGE.to_owned())
    }
}
