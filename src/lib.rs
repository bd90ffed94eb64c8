//! # qrelay
//!
//! Local-network chat relay with QR code onboarding.
//!
//! Serves a static chat page, relays WebSocket text messages between every
//! connected client, stores file uploads under the static directory, and
//! writes a QR code PNG encoding the LAN join URL so a phone can join by
//! scanning. Everything lives in one process; there is no persistence and
//! no delivery guarantee beyond best effort.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)     — chat page, uploads, health, static files
//!     ├── WS Handler (ws/)         — per-connection receive loop
//!     │
//!     ├── ConnectionRegistry (domain/) — membership + broadcast fan-out
//!     │
//!     ├── LAN detector (lan)       — best-effort join address
//!     └── QR generator (qr)        — join URL as a PNG
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod lan;
pub mod qr;
pub mod ws;
