//! HTTP façade over [`CatalogService`].

pub mod error;
pub mod handlers;

use crate::config::TomlConfig;
use crate::core::CatalogService;
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub service: CatalogService,
}

impl AppState {
    pub fn new(service: CatalogService) -> Self {
        Self { service }
    }
}

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::public_services))
        .route("/ibm", get(handlers::ibm_public_services))
        .route("/all", get(handlers::all_services))
        .route("/pricing/:service_id", get(handlers::service_pricing))
        .route("/cache/refresh", post(handlers::refresh_cache))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn setup_and_serve(config: &TomlConfig, service: CatalogService) -> anyhow::Result<()> {
    let app = api_router(AppState::new(service));
    let address = config.listen_address();

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    tracing::info!("🚀 catalog-proxy listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("error running HTTP server")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("👋 Shutting down");
}
