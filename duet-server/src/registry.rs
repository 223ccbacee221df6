use dashmap::DashMap;
use duet_core::{ConnectionId, RoomId, ServerMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Live connection record: the outbound half of its socket plus the room it
/// currently occupies.
struct Connection {
    tx: mpsc::UnboundedSender<ServerMessage>,
    room: Option<RoomId>,
}

/// Owns every active connection. A connection exists here from socket open
/// to socket close; everything that wants to reach a connection's outbound
/// channel goes through this map.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    connections: Arc<DashMap<ConnectionId, Connection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: ConnectionId, tx: mpsc::UnboundedSender<ServerMessage>) {
        self.connections.insert(id, Connection { tx, room: None });
    }

    /// Drops the record and returns the room it occupied, if any. Relays
    /// racing with this see the connection as gone and drop their message
    /// instead of queueing it.
    pub fn unregister(&self, id: &ConnectionId) -> Option<RoomId> {
        self.connections.remove(id).and_then(|(_, conn)| conn.room)
    }

    pub fn is_live(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    /// Delivers a message if the destination is still live. A miss is an
    /// expected race with peer departure, not an error.
    pub fn send(&self, id: ConnectionId, msg: ServerMessage) -> bool {
        match self.connections.get(&id) {
            Some(conn) => conn.tx.send(msg).is_ok(),
            None => {
                debug!(%id, "message to departed connection dropped");
                false
            }
        }
    }

    pub fn room_of(&self, id: &ConnectionId) -> Option<RoomId> {
        self.connections.get(id).and_then(|conn| conn.room.clone())
    }

    pub fn set_room(&self, id: &ConnectionId, room: RoomId) {
        if let Some(mut conn) = self.connections.get_mut(id) {
            conn.room = Some(room);
        }
    }

    /// Clears and returns the connection's room in one step.
    pub fn take_room(&self, id: &ConnectionId) -> Option<RoomId> {
        self.connections
            .get_mut(id)
            .and_then(|mut conn| conn.room.take())
    }
}
