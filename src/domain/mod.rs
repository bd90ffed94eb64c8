//! Domain layer: connection identity and the broadcast registry.
//!
//! This module contains the relay's core: an opaque per-connection handle
//! and the registry that tracks every live chat channel and fans inbound
//! messages out to all of them.

pub mod connection_id;
pub mod registry;

pub use connection_id::ConnectionId;
pub use registry::{BroadcastSummary, ConnectionRegistry, DeliveryFailure};
