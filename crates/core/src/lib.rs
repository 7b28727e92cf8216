//! Core types and query semantics for student-records
//!
//! Shared by the storage backends, the GraphQL server and the client mirror.

mod constants;
mod env_config;
mod error;
pub mod query;
mod student;
pub mod timestamp;

pub use constants::*;
pub use env_config::*;
pub use error::*;
pub use query::{
    AgeMatch, Page, SearchRequest, SortField, SortOrder, SortSpec, SortValue, StudentFilter,
    StudentQuery, apply, compare_students,
};
pub use student::*;
