//! Environment variable parsing with warn-level logging for invalid values.

use crate::constants::{DEFAULT_QUERY_LIMIT, MAX_QUERY_LIMIT};

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    parse_with_default(var, std::env::var(var).ok().as_deref(), default)
}

/// Read a string environment variable, treating blank values as unset.
pub fn env_string(var: &str) -> Option<String> {
    std::env::var(var).ok().map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    raw: Option<&str>,
    default: T,
) -> T {
    match raw {
        Some(v) => match v.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        None => default,
    }
}

/// Page-size bounds applied to every `students` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    /// Used when the caller omits `limit` or passes zero.
    pub default_limit: usize,
    /// Hard upper bound; larger requests are clamped.
    pub max_limit: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self { default_limit: DEFAULT_QUERY_LIMIT, max_limit: MAX_QUERY_LIMIT }
    }
}

impl QueryLimits {
    /// Reads `STUDENT_RECORDS_DEFAULT_LIMIT` and `STUDENT_RECORDS_MAX_LIMIT`.
    pub fn from_env() -> Self {
        Self::new(
            env_parse_with_default("STUDENT_RECORDS_DEFAULT_LIMIT", DEFAULT_QUERY_LIMIT),
            env_parse_with_default("STUDENT_RECORDS_MAX_LIMIT", MAX_QUERY_LIMIT),
        )
    }

    /// Builds limits, keeping `1 <= default_limit <= max_limit`.
    #[must_use]
    pub fn new(default_limit: usize, max_limit: usize) -> Self {
        let max_limit = max_limit.max(1);
        Self { default_limit: default_limit.clamp(1, max_limit), max_limit }
    }
}
