//! Service layer for student records
//!
//! Sits between the GraphQL resolvers and storage: validates input, builds
//! the authoritative query and turns missing records into typed errors.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]

mod error;
mod student_service;

pub use error::ServiceError;
pub use student_service::StudentService;
