//! In-process document store.
//!
//! Evaluates queries with the same predicate and comparator as the client
//! mirror, configured for exact age equality.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use student_records_core::{NewStudent, Student, StudentDocument, StudentQuery, query};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StorageError;
use crate::traits::StudentStore;

/// Documents keyed by id. Iteration order is by id, which gives ties on the
/// sort key a deterministic `id` ascending order.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    docs: Arc<RwLock<BTreeMap<String, StudentDocument>>>,
    closed: Arc<AtomicBool>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw document under `id`, replacing any existing one.
    pub async fn put_document(&self, id: impl Into<String>, doc: StudentDocument) {
        self.docs.write().await.insert(id.into(), doc);
    }

    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StorageError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl StudentStore for MemoryStorage {
    async fn find(&self, query: &StudentQuery) -> Result<Vec<Student>, StorageError> {
        self.ensure_open()?;
        let now = Utc::now();
        let snapshot: Vec<Student> = self
            .docs
            .read()
            .await
            .iter()
            .map(|(id, doc)| doc.clone().into_student(id.clone(), now))
            .collect();
        Ok(query::apply(&snapshot, &query.filter, query.sort, Some(query.page)))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Student>, StorageError> {
        self.ensure_open()?;
        let docs = self.docs.read().await;
        Ok(docs.get(id).map(|doc| doc.clone().into_student(id.to_owned(), Utc::now())))
    }

    async fn insert(&self, input: &NewStudent) -> Result<Student, StorageError> {
        self.ensure_open()?;
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let doc = StudentDocument::new(input, now);
        self.docs.write().await.insert(id.clone(), doc.clone());
        Ok(doc.into_student(id, now))
    }

    async fn update_by_id(
        &self,
        id: &str,
        input: &NewStudent,
    ) -> Result<Option<Student>, StorageError> {
        self.ensure_open()?;
        let now = Utc::now();
        let mut docs = self.docs.write().await;
        let Some(doc) = docs.get_mut(id) else {
            return Ok(None);
        };
        doc.apply_update(input, now);
        Ok(Some(doc.clone().into_student(id.to_owned(), now)))
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StorageError> {
        self.ensure_open()?;
        Ok(self.docs.write().await.remove(id).is_some())
    }

    async fn count(&self) -> Result<usize, StorageError> {
        self.ensure_open()?;
        Ok(self.docs.read().await.len())
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        self.ensure_open()
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.docs.write().await.clear();
        tracing::info!("MemoryStorage closed");
    }
}
