//! Unified storage backend with enum dispatch.

use async_trait::async_trait;
use student_records_core::{NewStudent, Student, StudentQuery};

use crate::error::StorageError;
use crate::traits::StudentStore;

macro_rules! dispatch {
    ($self:expr, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            StorageBackend::Postgres(s) => {
                <crate::pg_storage::PgStorage as StudentStore>::$method(s, $($arg),*).await
            },
            StorageBackend::Memory(s) => {
                <crate::memory::MemoryStorage as StudentStore>::$method(s, $($arg),*).await
            },
        }
    };
}

#[derive(Clone, Debug)]
pub enum StorageBackend {
    Postgres(crate::pg_storage::PgStorage),
    Memory(crate::memory::MemoryStorage),
}

impl StorageBackend {
    pub async fn new_postgres(database_url: &str) -> Result<Self, StorageError> {
        Ok(Self::Postgres(crate::pg_storage::PgStorage::new(database_url).await?))
    }

    #[must_use]
    pub fn new_memory() -> Self {
        Self::Memory(crate::memory::MemoryStorage::new())
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

#[async_trait]
impl StudentStore for StorageBackend {
    async fn find(&self, query: &StudentQuery) -> Result<Vec<Student>, StorageError> {
        dispatch!(self, find(query))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Student>, StorageError> {
        dispatch!(self, find_by_id(id))
    }

    async fn insert(&self, input: &NewStudent) -> Result<Student, StorageError> {
        dispatch!(self, insert(input))
    }

    async fn update_by_id(
        &self,
        id: &str,
        input: &NewStudent,
    ) -> Result<Option<Student>, StorageError> {
        dispatch!(self, update_by_id(id, input))
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StorageError> {
        dispatch!(self, delete_by_id(id))
    }

    async fn count(&self) -> Result<usize, StorageError> {
        dispatch!(self, count())
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        dispatch!(self, health_check())
    }

    async fn close(&self) {
        dispatch!(self, close());
    }
}
