use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use duet_core::{ConnectionId, RoomId};
use std::sync::Arc;
use tracing::info;

/// A room never holds more than this many connections.
pub const ROOM_CAPACITY: usize = 2;

#[derive(Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Admitted; `peers` are the occupants that were already present.
    Admitted { peers: Vec<ConnectionId> },
    Full,
}

/// Occupancy of every live room.
///
/// All mutation happens under the per-key entry guard, so concurrent joins
/// and leaves on the same room serialize: two joins racing for the second
/// slot admit exactly one. A room exists iff it has occupants: entries are
/// created on first join and removed the moment they empty.
#[derive(Clone, Default)]
pub struct RoomTable {
    rooms: Arc<DashMap<RoomId, Vec<ConnectionId>>>,
}

impl RoomTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&self, room: &RoomId, conn: ConnectionId) -> JoinOutcome {
        match self.rooms.entry(room.clone()) {
            Entry::Occupied(mut entry) => {
                let occupants = entry.get_mut();
                if occupants.len() >= ROOM_CAPACITY {
                    return JoinOutcome::Full;
                }
                let peers = occupants.clone();
                occupants.push(conn);
                JoinOutcome::Admitted { peers }
            }
            Entry::Vacant(entry) => {
                info!(%room, "creating room");
                entry.insert(vec![conn]);
                JoinOutcome::Admitted { peers: Vec::new() }
            }
        }
    }

    /// Removes `conn` from `room`, deleting the room when it empties.
    /// Returns the remaining occupants. No-op when the connection is not an
    /// occupant.
    pub fn leave(&self, room: &RoomId, conn: &ConnectionId) -> Vec<ConnectionId> {
        match self.rooms.entry(room.clone()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().retain(|occupant| occupant != conn);
                if entry.get().is_empty() {
                    info!(%room, "room empty, removing");
                    entry.remove();
                    Vec::new()
                } else {
                    entry.get().clone()
                }
            }
            Entry::Vacant(_) => Vec::new(),
        }
    }

    pub fn occupants(&self, room: &RoomId) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|occupants| occupants.clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, room: &RoomId) -> bool {
        self.rooms.contains_key(room)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
