use crate::model::connection::ConnectionId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages a client may send over its signaling socket.
///
/// SDP bodies and ICE candidates stay opaque `Value`s: the server relays them
/// verbatim and never looks past the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    Join { room_id: RoomId },
    Offer { sdp: Value, to: ConnectionId },
    Answer { sdp: Value, to: ConnectionId },
    IceCandidate { candidate: Value, to: ConnectionId },
    /// Auxiliary low-frequency state (mute, camera toggle, screenshare
    /// active) broadcast to the rest of the sender's room.
    Signal { payload: Value },
    Leave,
}

/// Messages the server pushes to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Sent once on connect so the client learns its own identifier.
    Welcome { id: ConnectionId },
    /// Both occupants are present; negotiation can start.
    Ready,
    RoomFull,
    PeerJoined { id: ConnectionId },
    PeerLeft { id: ConnectionId },
    Offer { sdp: Value, from: ConnectionId },
    Answer { sdp: Value, from: ConnectionId },
    IceCandidate { candidate: Value, from: ConnectionId },
    Signal { from: ConnectionId, payload: Value },
    /// Protocol violation report, scoped to the offending sender.
    Error { message: String },
}
