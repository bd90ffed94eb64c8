//! WebSocket layer: the upgrade handler and per-connection loop.
//!
//! The WebSocket endpoint at `/ws` is the chat channel. Frames carry
//! plain UTF-8 text with no envelope; every inbound text frame is
//! relayed verbatim to all registered connections.

pub mod connection;
pub mod handler;
