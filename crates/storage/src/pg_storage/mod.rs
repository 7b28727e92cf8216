//! PostgreSQL storage backend using sqlx.
//!
//! Each record is one row: an opaque `id` plus the JSONB document.

pub mod query;
mod students;

use std::time::Duration;

use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use student_records_core::{
    PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS, Student,
    StudentDocument,
};

use crate::error::StorageError;

use super::pg_migrations::run_pg_migrations;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_pg_migrations(&pool).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!("PgStorage initialized");
        Ok(Self { pool })
    }

    /// Stores a raw document under `id`, replacing any existing one.
    pub async fn put_document(&self, id: &str, doc: &StudentDocument) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO students (id, doc) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET doc = EXCLUDED.doc",
        )
        .bind(id)
        .bind(serde_json::to_value(doc)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Decodes an `id, doc` row. Timestamp problems are recovered inside
/// [`StudentDocument::into_student`]; a document of the wrong shape is
/// reported as corruption.
pub(crate) fn row_to_student(row: &PgRow) -> Result<Student, StorageError> {
    let id: String = row.try_get("id")?;
    let doc: Value = row.try_get("doc")?;
    let doc: StudentDocument = serde_json::from_value(doc).map_err(|e| {
        tracing::warn!(%id, error = %e, "student document has unexpected shape");
        StorageError::DataCorruption { context: format!("student {id}"), source: Box::new(e) }
    })?;
    Ok(doc.into_student(id, chrono::Utc::now()))
}

pub(crate) fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Convert `usize` to `i64` for SQL LIMIT/OFFSET binds.
/// Saturates to `i64::MAX` on overflow (only possible on 128-bit targets).
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}
