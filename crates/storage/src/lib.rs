//! Document storage for student records.
//!
//! Records are stored as JSON documents keyed by an opaque id. PostgreSQL
//! keeps them in a JSONB column; the in-memory backend keeps them in a map
//! and evaluates queries with the shared predicate from the core crate.

mod backend;
pub mod error;
mod memory;
mod pg_migrations;
pub mod pg_storage;
pub mod traits;

pub use backend::StorageBackend;
pub use error::StorageError;
pub use memory::MemoryStorage;
pub use pg_storage::PgStorage;
pub use traits::StudentStore;
