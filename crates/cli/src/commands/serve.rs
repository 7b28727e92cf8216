use std::sync::Arc;

use anyhow::{Context, Result};
use student_records_core::{QueryLimits, env_string};
use student_records_http::{AppState, create_router_with_cors};
use student_records_service::StudentService;
use student_records_storage::{StorageBackend, StudentStore};

pub(crate) async fn run(
    host: String,
    port: u16,
    memory: bool,
    cors_origins: Vec<String>,
) -> Result<()> {
    let storage = if memory {
        tracing::info!("Using in-memory storage, records are lost on exit");
        StorageBackend::new_memory()
    } else {
        let url = env_string("DATABASE_URL")
            .context("DATABASE_URL must be set unless --memory is used")?;
        StorageBackend::new_postgres(&url).await?
    };
    let storage = Arc::new(storage);

    let limits = QueryLimits::from_env();
    let service = StudentService::new(Arc::clone(&storage), limits);
    let state = Arc::new(AppState::new(service));
    let router = create_router_with_cors(state, &cors_origins);

    let addr = format!("{host}:{port}");
    tracing::info!(
        backend = storage.kind(),
        default_limit = limits.default_limit,
        max_limit = limits.max_limit,
        "Starting HTTP server on {}",
        addr
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    storage.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
