//! HRM API Server Entry Point
//!
//! Reads configuration from the environment, applies the schema migration
//! and serves the router.

use std::net::SocketAddr;

use axum::{extract::Request, ServiceExt};
use hrm_api::telemetry::{init_tracing, TelemetryConfig};
use hrm_api::{
    create_api_router, ApiConfig, ApiError, ApiResult, AppState, AuthConfig, DbClient, DbConfig,
    ServerConfig,
};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::default();
    init_tracing(&telemetry_config)?;

    let db_config = DbConfig::from_env();
    let db = DbClient::from_config(&db_config)?;
    db.migrate().await?;
    tracing::info!(host = %db_config.host, dbname = %db_config.dbname, "Database schema ready");

    let api_config = ApiConfig::from_env();
    let auth_config = AuthConfig::from_env();
    let state = AppState::new(db, api_config, auth_config);
    let app = create_api_router(state)?;

    let addr = ServerConfig::from_env().socket_addr();
    tracing::info!(%addr, "Starting HRM API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let service = ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app);
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
