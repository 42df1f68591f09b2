//! corpdir-api: HTTP server for the multilingual company directory.

use std::sync::Arc;

use tracing::info;

use corpdir_api::{config::ApiConfig, router, telemetry, AppState};
use corpdir_db::{log_pool_metrics, Database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let _log_guard = telemetry::init_tracing(telemetry::DEFAULT_API_FILTER, "corpdir-api.log");

    let config = ApiConfig::from_env()?;
    let addr = config.bind_addr()?;

    let db = Database::connect_with_config(&config.database_url, config.pool_config()).await?;
    db.migrate().await?;
    log_pool_metrics(db.pool());
    info!(subsystem = "api", "Database migrations applied");

    let state = AppState::new(Arc::new(db.directory.clone()));
    let app = router(state, config.request_body_limit_bytes);

    info!(
        subsystem = "api",
        body_limit_bytes = config.request_body_limit_bytes,
        "Starting server on {}",
        addr
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(subsystem = "api", "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(subsystem = "api", error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(subsystem = "api", "Shutdown signal received");
}
