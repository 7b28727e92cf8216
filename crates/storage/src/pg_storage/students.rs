//! StudentStore implementation for PgStorage.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use student_records_core::{NewStudent, Student, StudentDocument, StudentQuery};
use uuid::Uuid;

use super::query::{Bind, build_find_query};
use super::{PgStorage, row_to_student};
use crate::error::StorageError;
use crate::traits::StudentStore;

#[async_trait]
impl StudentStore for PgStorage {
    async fn find(&self, query: &StudentQuery) -> Result<Vec<Student>, StorageError> {
        let find = build_find_query(query);
        let mut q = sqlx::query(&find.sql);
        for bind in &find.binds {
            q = match bind {
                Bind::Text(s) => q.bind(s),
                Bind::Int(n) => q.bind(*n),
                Bind::BigInt(n) => q.bind(*n),
            };
        }
        let rows = q.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_student).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Student>, StorageError> {
        let row = sqlx::query("SELECT id, doc FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_student(&r)).transpose()
    }

    async fn insert(&self, input: &NewStudent) -> Result<Student, StorageError> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let doc = StudentDocument::new(input, now);
        sqlx::query("INSERT INTO students (id, doc) VALUES ($1, $2)")
            .bind(&id)
            .bind(serde_json::to_value(&doc)?)
            .execute(&self.pool)
            .await?;
        Ok(doc.into_student(id, now))
    }

    async fn update_by_id(
        &self,
        id: &str,
        input: &NewStudent,
    ) -> Result<Option<Student>, StorageError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let current: Option<Value> =
            sqlx::query_scalar("SELECT doc FROM students WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(current) = current else {
            return Ok(None);
        };
        let mut doc: StudentDocument = serde_json::from_value(current)?;
        doc.apply_update(input, now);
        sqlx::query("UPDATE students SET doc = $2 WHERE id = $1")
            .bind(id)
            .bind(serde_json::to_value(&doc)?)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(doc.into_student(id.to_owned(), now)))
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StorageError> {
        let result =
            sqlx::query("DELETE FROM students WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<usize, StorageError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM students").fetch_one(&self.pool).await?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PgStorage closed");
    }
}
