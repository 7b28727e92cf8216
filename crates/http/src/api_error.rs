//! Typed API error for resolvers and HTTP handlers.
//!
//! Resolvers turn it into a GraphQL error carrying a `code` extension; plain
//! HTTP handlers turn it into a JSON response with a status code.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use student_records_core::CoreError;
use student_records_service::ServiceError;

pub const STUDENT_NOT_FOUND: &str = "Student not found";

/// API error with a caller-facing message.
///
/// `Internal` logs the real error server-side and exposes only the static
/// per-operation message.
#[derive(Debug)]
pub enum ApiError {
    /// `BAD_USER_INPUT` / 400: invalid input from caller.
    BadUserInput(String),
    /// `NOT_FOUND` / 404: requested record doesn't exist.
    NotFound(String),
    /// `INTERNAL` / 500: unexpected failure. Details logged, not exposed.
    Internal { message: &'static str, source: anyhow::Error },
    /// `UNAVAILABLE` / 503: storage not reachable.
    ServiceUnavailable(String),
}

impl ApiError {
    /// Maps a service failure, using `context` as the message for storage
    /// failures (e.g. "Failed to fetch students").
    pub fn from_service(err: ServiceError, context: &'static str) -> Self {
        match err {
            ServiceError::NotFound { .. } => Self::NotFound(STUDENT_NOT_FOUND.to_owned()),
            ServiceError::InvalidInput(msg) => Self::BadUserInput(msg),
            ServiceError::Storage(_) => Self::Internal { message: context, source: err.into() },
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadUserInput(_) => "BAD_USER_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Internal { .. } => "INTERNAL",
            Self::ServiceUnavailable(_) => "UNAVAILABLE",
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::BadUserInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Logs internal causes and returns the caller-facing message.
    fn into_message(self) -> String {
        match self {
            Self::BadUserInput(msg) | Self::NotFound(msg) | Self::ServiceUnavailable(msg) => msg,
            Self::Internal { message, source } => {
                tracing::error!(error = ?source, "{message}");
                message.to_owned()
            },
        }
    }

    /// GraphQL error with `extensions.code`.
    #[must_use]
    pub fn into_graphql(self) -> async_graphql::Error {
        use async_graphql::ErrorExtensions as _;
        let code = self.code();
        async_graphql::Error::new(self.into_message()).extend_with(|_, ext| ext.set("code", code))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let body = serde_json::json!({"error": self.into_message(), "code": code});
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match ServiceError::from(err) {
            ServiceError::InvalidInput(msg) => Self::BadUserInput(msg),
            other => Self::BadUserInput(other.to_string()),
        }
    }
}
