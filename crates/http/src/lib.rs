//! HTTP API server for student records.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]

pub mod api_error;
mod graphql_types;
mod response_types;
mod schema;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::http::{HeaderValue, Method, header};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use student_records_core::GRAPHQL_PATH;
use student_records_service::StudentService;
use student_records_storage::StudentStore;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::api_error::ApiError;

pub use graphql_types::{NewStudentInput, SearchStudentInput, StudentObject};
pub use response_types::{ReadinessResponse, VersionResponse};
pub use schema::{MutationRoot, QueryRoot, StudentSchema, build_schema};

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// Service behind the resolvers, also used for readiness checks
    pub service: StudentService,
    pub schema: StudentSchema,
}

impl AppState {
    #[must_use]
    pub fn new(service: StudentService) -> Self {
        let schema = build_schema(service.clone());
        Self { service, schema }
    }
}

/// Router with every origin allowed.
pub fn create_router(state: Arc<AppState>) -> Router {
    create_router_with_cors(state, &[])
}

/// Router restricted to `cors_allowed_origins`; an empty list allows any origin.
pub fn create_router_with_cors(state: Arc<AppState>, cors_allowed_origins: &[String]) -> Router {
    Router::new()
        .route(GRAPHQL_PATH, get(graphiql).post(graphql_handler))
        .route("/health", get(health))
        .route("/api/readiness", get(readiness))
        .route("/api/version", get(version))
        .layer(build_cors_layer(cors_allowed_origins))
        .with_state(state)
}

fn build_cors_layer(cors_allowed_origins: &[String]) -> CorsLayer {
    let origin = if cors_allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let mut parsed = Vec::new();
        for origin in cors_allowed_origins {
            match HeaderValue::from_str(origin) {
                Ok(value) => parsed.push(value),
                Err(err) => tracing::warn!("ignoring invalid CORS origin '{origin}': {err}"),
            }
        }
        AllowOrigin::list(parsed)
    };
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(origin)
}

async fn graphql_handler(
    State(state): State<Arc<AppState>>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

async fn health() -> &'static str {
    "ok"
}

async fn readiness(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReadinessResponse>, ApiError> {
    let storage = state.service.storage();
    if let Err(e) = storage.health_check().await {
        tracing::warn!(error = %e, backend = storage.kind(), "readiness check failed");
        return Err(ApiError::ServiceUnavailable("storage unavailable".to_owned()));
    }
    Ok(Json(ReadinessResponse { status: "ready", backend: storage.kind() }))
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
