//! Live-connection membership and broadcast fan-out.
//!
//! [`ConnectionRegistry`] stores the outbound queue of every open chat
//! connection in a `HashMap` behind a single [`tokio::sync::RwLock`].
//! Broadcast iterates over a snapshot of the membership taken under the
//! read lock, so evictions triggered by failed deliveries never mutate a
//! collection that is being iterated.
//!
//! # Concurrency
//!
//! - Every receive-loop task may call [`ConnectionRegistry::broadcast`]
//!   concurrently with registrations and removals.
//! - A connection registered while a broadcast is in flight may miss that
//!   one message; this race is accepted.
//! - Removal is idempotent: unregistering an absent handle is a no-op,
//!   so eviction during broadcast and the receive loop's own cleanup can
//!   both run for the same connection.
//!
//! Delivery policy is best effort: a connection whose queue is full or
//! whose peer is gone is evicted and the broadcast continues. A broadcast
//! never fails as a whole because of one bad member.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tokio::sync::mpsc;

use super::ConnectionId;

/// Why a single delivery attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// The connection's outbound queue was full. There is no flow
    /// control; a recipient that cannot drain its queue is dropped.
    QueueFull,
    /// The connection's receive loop has already terminated.
    PeerGone,
}

/// Outcome of one [`ConnectionRegistry::broadcast`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastSummary {
    /// Members in the snapshot, i.e. delivery attempts made.
    pub attempted: usize,
    /// Deliveries that were queued successfully.
    pub delivered: usize,
    /// Members evicted because their delivery failed.
    pub evicted: usize,
}

/// Central registry of open chat connections.
///
/// Each member is an outbound [`mpsc::Sender`]; the matching receiver is
/// drained by that connection's receive loop and forwarded onto its
/// WebSocket.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, mpsc::Sender<String>>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Adds a connection's outbound queue, returning its fresh handle.
    ///
    /// The caller must have completed the protocol handshake already;
    /// there is no failure mode. Handles are unique per registration, so
    /// the registry can never hold duplicate members.
    pub async fn register(&self, outbound: mpsc::Sender<String>) -> ConnectionId {
        let id = ConnectionId::new();
        self.connections.write().await.insert(id, outbound);
        tracing::debug!(%id, "connection registered");
        id
    }

    /// Removes a connection if present.
    ///
    /// Returns `true` if the connection was a member. Unregistering an
    /// absent handle is a no-op, never an error, so this is safe to call
    /// repeatedly and concurrently with a broadcast evicting the same
    /// handle.
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        let removed = self.connections.write().await.remove(&id).is_some();
        if removed {
            tracing::debug!(%id, "connection unregistered");
        }
        removed
    }

    /// Delivers `message` to every connection in the current membership.
    ///
    /// The membership is snapshotted at the start of the call; the lock
    /// is not held while delivering. Members whose delivery fails are
    /// evicted and the broadcast continues with the rest.
    pub async fn broadcast(&self, message: &str) -> BroadcastSummary {
        let snapshot: Vec<(ConnectionId, mpsc::Sender<String>)> = {
            let map = self.connections.read().await;
            map.iter().map(|(id, tx)| (*id, tx.clone())).collect()
        };

        let mut summary = BroadcastSummary {
            attempted: snapshot.len(),
            ..BroadcastSummary::default()
        };

        let mut failed = Vec::new();
        for (id, tx) in snapshot {
            match try_deliver(&tx, message) {
                Ok(()) => summary.delivered += 1,
                Err(failure) => {
                    tracing::debug!(%id, ?failure, "delivery failed, evicting connection");
                    failed.push(id);
                }
            }
        }

        for id in &failed {
            self.unregister(*id).await;
        }
        summary.evicted = failed.len();
        summary
    }

    /// Returns the number of registered connections.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Returns `true` if no connections are registered.
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }
}

/// Queues `message` on one connection, classifying any failure.
fn try_deliver(tx: &mpsc::Sender<String>, message: &str) -> Result<(), DeliveryFailure> {
    tx.try_send(message.to_owned()).map_err(|err| match err {
        mpsc::error::TrySendError::Full(_) => DeliveryFailure::QueueFull,
        mpsc::error::TrySendError::Closed(_) => DeliveryFailure::PeerGone,
    })
}
