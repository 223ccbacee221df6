use crate::error::ProtocolError;
use crate::registry::ConnectionRegistry;
use crate::relay::RelayRouter;
use crate::room::{JoinOutcome, RoomTable};
use duet_core::{ClientMessage, ConnectionId, IceConfig, RoomId, ServerMessage};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// The cross-connection heart of the server: connection registry, room
/// table and relay router behind one cloneable handle.
///
/// Every method is synchronous and never holds a map guard across a send,
/// so a connection task can call in from any point of its read loop without
/// blocking the rest of the server.
#[derive(Clone)]
pub struct SignalingService {
    registry: ConnectionRegistry,
    rooms: RoomTable,
    router: RelayRouter,
    ice_config: Arc<IceConfig>,
}

impl SignalingService {
    pub fn new(ice_config: IceConfig) -> Self {
        let registry = ConnectionRegistry::new();
        Self {
            router: RelayRouter::new(registry.clone()),
            rooms: RoomTable::new(),
            registry,
            ice_config: Arc::new(ice_config),
        }
    }

    pub fn ice_config(&self) -> IceConfig {
        (*self.ice_config).clone()
    }

    pub fn register(&self, id: ConnectionId, tx: mpsc::UnboundedSender<ServerMessage>) {
        self.registry.register(id, tx);
    }

    pub fn send_to(&self, id: ConnectionId, msg: ServerMessage) {
        self.registry.send(id, msg);
    }

    /// Dispatch one parsed client message.
    pub fn handle_message(
        &self,
        from: ConnectionId,
        msg: ClientMessage,
    ) -> Result<(), ProtocolError> {
        match msg {
            ClientMessage::Join { room_id } => return self.join(from, room_id),
            ClientMessage::Offer { sdp, to } => {
                self.relay_to_peer(from, to, ServerMessage::Offer { sdp, from });
            }
            ClientMessage::Answer { sdp, to } => {
                self.relay_to_peer(from, to, ServerMessage::Answer { sdp, from });
            }
            ClientMessage::IceCandidate { candidate, to } => {
                self.relay_to_peer(from, to, ServerMessage::IceCandidate { candidate, from });
            }
            ClientMessage::Signal { payload } => self.relay_to_room(from, payload),
            ClientMessage::Leave => self.leave(from),
        }
        Ok(())
    }

    /// Socket closed, cleanly or not. Unregisters first so that concurrent
    /// relays aimed at this connection turn into drops, then runs the same
    /// room cleanup as an explicit leave.
    pub fn disconnect(&self, conn: ConnectionId) {
        if let Some(room) = self.registry.unregister(&conn) {
            self.exit_room(conn, &room);
        }
    }

    fn join(&self, conn: ConnectionId, room_id: RoomId) -> Result<(), ProtocolError> {
        if room_id.0.trim().is_empty() {
            return Err(ProtocolError::MissingRoomId);
        }
        if self.registry.room_of(&conn).is_some() {
            return Err(ProtocolError::AlreadyInRoom);
        }

        match self.rooms.join(&room_id, conn) {
            JoinOutcome::Full => {
                info!(%conn, room = %room_id, "join rejected, room full");
                self.registry.send(conn, ServerMessage::RoomFull);
            }
            JoinOutcome::Admitted { peers } => {
                info!(%conn, room = %room_id, occupants = peers.len() + 1, "joined room");
                self.registry.set_room(&conn, room_id);
                for peer in &peers {
                    self.registry.send(*peer, ServerMessage::PeerJoined { id: conn });
                }
                // Second occupant completes the pair: both sides may start
                // negotiating.
                if !peers.is_empty() {
                    self.registry.send(conn, ServerMessage::Ready);
                    for peer in &peers {
                        self.registry.send(*peer, ServerMessage::Ready);
                    }
                }
            }
        }
        Ok(())
    }

    fn leave(&self, conn: ConnectionId) {
        // Idempotent: leaving while not in a room is a no-op.
        if let Some(room) = self.registry.take_room(&conn) {
            self.exit_room(conn, &room);
        }
    }

    fn exit_room(&self, conn: ConnectionId, room: &RoomId) {
        let remaining = self.rooms.leave(room, &conn);
        info!(%conn, %room, "left room");
        for peer in remaining {
            self.registry.send(peer, ServerMessage::PeerLeft { id: conn });
        }
    }

    fn relay_to_peer(&self, from: ConnectionId, to: ConnectionId, msg: ServerMessage) {
        if self.registry.room_of(&from).is_none() {
            debug!(%from, "relay from connection outside any room dropped");
            return;
        }
        self.router.direct(from, to, msg);
    }

    fn relay_to_room(&self, from: ConnectionId, payload: Value) {
        let Some(room) = self.registry.room_of(&from) else {
            debug!(%from, "signal from connection outside any room dropped");
            return;
        };
        let occupants = self.rooms.occupants(&room);
        self.router
            .room(from, &occupants, ServerMessage::Signal { from, payload });
    }
}
