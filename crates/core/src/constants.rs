//! Shared constants for student-records.

/// Default page size for the `students` query when the caller omits `limit`.
pub const DEFAULT_QUERY_LIMIT: usize = 50;

/// Page size the client requests by default.
pub const CLIENT_QUERY_LIMIT: usize = 100;

/// Maximum number of records for any query (DoS protection).
pub const MAX_QUERY_LIMIT: usize = 1000;

/// Quiet period a search input must stay unchanged before it is propagated.
pub const SEARCH_DEBOUNCE_MS: u64 = 500;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 10;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 10;

/// Default bind address of the HTTP server.
pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";

/// Default port of the HTTP server.
pub const DEFAULT_HTTP_PORT: u16 = 4000;

/// Route the GraphQL endpoint is mounted on.
pub const GRAPHQL_PATH: &str = "/api/graphql";

/// Message returned by a successful `deleteStudent` mutation.
pub const STUDENT_DELETED_MESSAGE: &str = "Student deleted successfully";
