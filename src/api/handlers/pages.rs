//! The chat page.
//!
//! The page is a single self-contained HTML file embedded at compile
//! time, so the binary serves it without caring where it runs from.

use axum::Router;
use axum::response::Html;
use axum::routing::get;

use crate::app_state::AppState;

/// Chat UI served at `/`.
const CHAT_PAGE: &str = include_str!("../../../assets/index.html");

/// `GET /` — Serve the chat page.
pub async fn index_handler() -> Html<&'static str> {
    Html(CHAT_PAGE)
}

/// Page routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(index_handler))
}
