//! Per-connection receive loop.
//!
//! Handles the read/write loop for a single WebSocket connection:
//! inbound text frames go to the registry for fan-out, and messages
//! queued by other connections' broadcasts are written back out.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::domain::ConnectionRegistry;

/// Runs the receive loop for a single WebSocket connection.
///
/// Registers the connection, then loops until the peer closes, a read
/// fails, a write fails, or the registry evicts the connection (its
/// outbound queue closes). Unregisters on the way out; that call is a
/// no-op when a broadcast already evicted this connection.
pub async fn run_connection(
    socket: WebSocket,
    registry: Arc<ConnectionRegistry>,
    queue_capacity: usize,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (out_tx, mut out_rx) = mpsc::channel::<String>(queue_capacity);

    let id = registry.register(out_tx).await;

    loop {
        tokio::select! {
            // Incoming frame from the peer
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        registry.broadcast(text.as_str()).await;
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Binary frames are ignored; axum answers pings itself.
                    _ => {}
                }
            }
            // Message queued for this connection by a broadcast
            out = out_rx.recv() => {
                match out {
                    Some(text) => {
                        if ws_tx.send(Message::text(text)).await.is_err() {
                            break;
                        }
                    }
                    // Queue closed: every sender is gone, i.e. evicted.
                    None => break,
                }
            }
        }
    }

    registry.unregister(id).await;
    tracing::debug!(%id, "ws connection closed");
}
