use thiserror::Error;

/// Violations of the signaling protocol. Reported back to the offending
/// sender only; room state is never affected.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("roomId required")]
    MissingRoomId,

    #[error("already in a room")]
    AlreadyInRoom,

    #[error("invalid message: {0}")]
    Malformed(#[from] serde_json::Error),
}
