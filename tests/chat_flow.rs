//! End-to-end tests driving a real listener: WebSocket chat relay
//! behavior and the upload round trip.

#![allow(clippy::expect_used, clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tower::ServiceExt;

use qrelay::api;
use qrelay::app_state::AppState;
use qrelay::config::RelayConfig;
use qrelay::domain::ConnectionRegistry;
use qrelay::ws::handler::ws_handler;

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

fn test_config() -> RelayConfig {
    let static_dir = std::env::temp_dir().join(format!("qrelay-it-{}", uuid::Uuid::new_v4()));
    RelayConfig {
        listen_addr: "127.0.0.1:0".parse().expect("literal addr"),
        static_dir,
        outbound_queue_capacity: 64,
        max_upload_bytes: 16 * 1024 * 1024,
    }
}

fn build_app(config: &RelayConfig) -> Router {
    let state = AppState {
        registry: Arc::new(ConnectionRegistry::new()),
        config: Arc::new(config.clone()),
    };
    Router::new()
        .merge(api::build_router(config))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

async fn spawn_app() -> (SocketAddr, RelayConfig) {
    let config = test_config();
    tokio::fs::create_dir_all(config.upload_dir())
        .await
        .expect("create upload dir");

    let app = build_app(&config);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    (addr, config)
}

async fn recv_text(ws: &mut WsClient) -> String {
    loop {
        let msg = timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("frame error");
        if msg.is_text() {
            return msg.into_text().expect("utf8 text").as_str().to_owned();
        }
    }
}

#[tokio::test]
async fn two_clients_chat_and_survive_a_disconnect() {
    let (addr, _config) = spawn_app().await;
    let url = format!("ws://{addr}/ws");

    let (mut client_a, _) = connect_async(url.as_str()).await.expect("client A connects");
    let (mut client_b, _) = connect_async(url.as_str()).await.expect("client B connects");
    // Let both registrations land before the first broadcast.
    sleep(Duration::from_millis(200)).await;

    client_a
        .send(Message::text("hello"))
        .await
        .expect("A sends");

    // Echo back to the sender is intended semantics.
    assert_eq!(recv_text(&mut client_a).await, "hello");
    assert_eq!(recv_text(&mut client_b).await, "hello");

    client_b.close(None).await.expect("B closes");
    sleep(Duration::from_millis(200)).await;

    client_a
        .send(Message::text("world"))
        .await
        .expect("A sends after B left");
    assert_eq!(recv_text(&mut client_a).await, "world");
}

#[tokio::test]
async fn upload_round_trip_strips_traversal() {
    let (addr, config) = spawn_app().await;
    let payload: Vec<u8> = (0u32..4096).flat_map(u32::to_le_bytes).collect();

    let part = reqwest::multipart::Part::bytes(payload.clone())
        .file_name("a/../../evil.png")
        .mime_str("image/png")
        .expect("static mime string");
    let form = reqwest::multipart::Form::new().part("file", part);

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/upload"))
        .multipart(form)
        .send()
        .await
        .expect("upload request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(
        body.get("url").and_then(serde_json::Value::as_str),
        Some("/static/uploads/evil.png")
    );

    // The stored bytes round-trip through the static mount.
    let fetched = client
        .get(format!("http://{addr}/static/uploads/evil.png"))
        .send()
        .await
        .expect("fetch stored file")
        .bytes()
        .await
        .expect("stored file body");
    assert_eq!(fetched.as_ref(), payload.as_slice());

    assert!(config.upload_dir().join("evil.png").is_file());
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let (addr, _config) = spawn_app().await;

    let form = reqwest::multipart::Form::new().text("note", "no file here");
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/upload"))
        .multipart(form)
        .send()
        .await
        .expect("upload request");

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(
        body.get("error")
            .and_then(|e| e.get("code"))
            .and_then(serde_json::Value::as_u64),
        Some(1002)
    );
}

#[tokio::test]
async fn chat_page_and_health_respond() {
    let config = test_config();
    let app = build_app(&config);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("page body");
    assert!(String::from_utf8_lossy(&bytes).contains("qrelay"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}
