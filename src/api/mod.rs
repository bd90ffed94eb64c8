//! HTTP layer: route handlers, DTOs, and router composition.
//!
//! Chat-facing routes (page, uploads, static files) live at the root;
//! there is no versioned API prefix for a single-page LAN tool.

pub mod dto;
pub mod handlers;

use axum::Router;
use tower_http::services::ServeDir;

use crate::app_state::AppState;
use crate::config::RelayConfig;

/// OpenAPI document for the relay's REST surface.
///
/// The WebSocket endpoint is not part of the OpenAPI description; its
/// protocol is plain text frames.
#[derive(Debug, utoipa::OpenApi)]
#[openapi(
    paths(handlers::system::health_handler, handlers::upload::upload_handler),
    components(schemas(dto::UploadResponse, crate::error::ErrorResponse)),
    tags(
        (name = "System", description = "Service status"),
        (name = "Uploads", description = "File sharing"),
    )
)]
pub struct ApiDoc;

/// Builds the complete router: chat page, uploads, health, and the
/// static directory (QR code and stored uploads).
pub fn build_router(config: &RelayConfig) -> Router<AppState> {
    Router::new()
        .merge(handlers::pages::routes())
        .merge(handlers::system::routes())
        .merge(handlers::upload::routes(config))
        .nest_service("/static", ServeDir::new(&config.static_dir))
}
