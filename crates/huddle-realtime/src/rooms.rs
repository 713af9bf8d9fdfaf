//! Bidirectional room membership index.

use crate::client::ClientId;
use std::collections::{HashMap, HashSet};

/// Outcome of a join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinOutcome {
    /// The client was not already a member.
    pub newly_joined: bool,
    /// The room had no local members before this join.
    pub first_local_member: bool,
}

/// Outcome of a leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// The client was actually a member.
    pub was_member: bool,
    /// The room has no local members left.
    pub room_now_empty: bool,
}

/// Tracks which clients are in which rooms, in both directions.
///
/// Both maps are updated together under the caller's lock, so they can
/// never disagree.
#[derive(Debug, Default)]
pub struct RoomMemberships {
    rooms: HashMap<String, HashSet<ClientId>>,
    clients: HashMap<ClientId, HashSet<String>>,
}

impl RoomMemberships {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `client` to `room`.
    pub fn join(&mut self, client: &ClientId, room: &str) -> JoinOutcome {
        let members = self.rooms.entry(room.to_string()).or_default();
        let first_local_member = members.is_empty();
        let newly_joined = members.insert(client.clone());
        self.clients
            .entry(client.clone())
            .or_default()
            .insert(room.to_string());
        JoinOutcome {
            newly_joined,
            first_local_member,
        }
    }

    /// Remove `client` from `room`.
    pub fn leave(&mut self, client: &ClientId, room: &str) -> LeaveOutcome {
        let mut was_member = false;
        let mut room_now_empty = false;

        if let Some(members) = self.rooms.get_mut(room) {
            was_member = members.remove(client);
            if members.is_empty() {
                self.rooms.remove(room);
                room_now_empty = true;
            }
        }
        if let Some(rooms) = self.clients.get_mut(client) {
            rooms.remove(room);
            if rooms.is_empty() {
                self.clients.remove(client);
            }
        }

        LeaveOutcome {
            was_member,
            room_now_empty,
        }
    }

    /// Remove `client` from every room it is in.
    ///
    /// Returns each room it was in, with a flag for rooms it left empty.
    pub fn remove_client(&mut self, client: &ClientId) -> Vec<(String, bool)> {
        let rooms = match self.clients.remove(client) {
            Some(rooms) => rooms,
            None => return Vec::new(),
        };

        let mut left = Vec::with_capacity(rooms.len());
        for room in rooms {
            let mut now_empty = false;
            if let Some(members) = self.rooms.get_mut(&room) {
                members.remove(client);
                if members.is_empty() {
                    self.rooms.remove(&room);
                    now_empty = true;
                }
            }
            left.push((room, now_empty));
        }
        left
    }

    /// Members of `room`, in no particular order.
    pub fn members(&self, room: &str) -> Vec<ClientId> {
        self.rooms
            .get(room)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of local members of `room`.
    pub fn room_size(&self, room: &str) -> usize {
        self.rooms.get(room).map_or(0, HashSet::len)
    }

    /// Rooms `client` is a member of.
    pub fn rooms_of(&self, client: &ClientId) -> Vec<String> {
        self.clients
            .get(client)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default()
    }
}
