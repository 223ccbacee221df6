use crate::registry::ConnectionRegistry;
use duet_core::{ConnectionId, ServerMessage};
use tracing::debug;

/// Forwards signaling payloads between connections. Purely structural: the
/// envelope is routed, the payload is never inspected or transformed.
#[derive(Clone)]
pub struct RelayRouter {
    registry: ConnectionRegistry,
}

impl RelayRouter {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self { registry }
    }

    /// Forward to a named peer. Silently drops when the destination is no
    /// longer live, an expected race with peer departure.
    pub fn direct(&self, from: ConnectionId, to: ConnectionId, msg: ServerMessage) {
        if !self.registry.send(to, msg) {
            debug!(%from, %to, "relay target gone, message dropped");
        }
    }

    /// Forward to every other occupant of the sender's room (at most one).
    pub fn room(&self, from: ConnectionId, occupants: &[ConnectionId], msg: ServerMessage) {
        for occupant in occupants {
            if *occupant != from {
                self.direct(from, *occupant, msg.clone());
            }
        }
    }
}
