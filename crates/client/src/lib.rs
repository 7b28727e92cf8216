//! Client side of student records: a typed GraphQL client, the in-memory
//! search/sort mirror used for presentation, form validation and a debouncer
//! for search input.

mod client;
mod debounce;
pub mod error;
mod form;
mod search_state;

pub use client::StudentClient;
pub use debounce::Debouncer;
pub use error::ClientError;
pub use form::{FormErrors, StudentForm};
pub use search_state::{SORT_OPTIONS, SearchState, SearchStats};
