//! qrelay server entry point.
//!
//! Generates the join QR code, then starts the Axum HTTP server with the
//! chat page, upload, and WebSocket endpoints.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use qrelay::api;
use qrelay::app_state::AppState;
use qrelay::config::RelayConfig;
use qrelay::domain::ConnectionRegistry;
use qrelay::ws::handler::ws_handler;
use qrelay::{lan, qr};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = RelayConfig::from_env().context("invalid LISTEN_ADDR")?;
    tracing::info!(addr = %config.listen_addr, "starting qrelay");

    tokio::fs::create_dir_all(config.upload_dir())
        .await
        .with_context(|| format!("failed to create {}", config.upload_dir().display()))?;

    // Join URLs and the QR code, before the listener starts
    let port = config.listen_addr.port();
    let lan_ip = lan::detect_lan_ip();
    let join_url = lan::build_join_url(lan_ip, port);
    let qr_path = config.qr_path();
    qr::generate_qr(&join_url, &qr_path).context("failed to write join QR code")?;

    tracing::info!(url = %join_url, "LAN join URL");
    tracing::info!(url = %format!("http://127.0.0.1:{port}/"), "local URL");
    tracing::info!(path = %qr_path.display(), "QR code written");

    // Build application state
    let registry = Arc::new(ConnectionRegistry::new());
    let app_state = AppState {
        registry,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router(&config))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
        )
    };

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
