//! Connection state machine and room membership.

use super::value_object::Room;

/// Lifecycle of the realtime connection as seen by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Errored,
}

/// Link-level signal reported by the transport, stripped of payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    Connecting,
    Connected,
    Error,
    Closed,
}

impl ConnectionState {
    /// Next state after the transport reports `event`.
    ///
    /// Every state accepts every event; the transport is the only source of
    /// truth and its reports are never rejected.
    pub fn transition(self, event: LinkEvent) -> ConnectionState {
        match event {
            LinkEvent::Connecting => ConnectionState::Connecting,
            LinkEvent::Connected => ConnectionState::Connected,
            LinkEvent::Error => ConnectionState::Errored,
            LinkEvent::Closed => ConnectionState::Disconnected,
        }
    }

    /// Whether moving from `self` to `next` is a fresh connection, which
    /// requires room membership to be re-asserted.
    pub fn enters_connected(self, next: ConnectionState) -> bool {
        self != ConnectionState::Connected && next == ConnectionState::Connected
    }
}

/// Rooms the client intends to be in, in the order they were requested.
///
/// The server forgets membership on every reconnect, so this list is the
/// only record of it.
#[derive(Debug, Clone, Default)]
pub struct RoomMembership {
    rooms: Vec<Room>,
}

impl RoomMembership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `room`; returns `false` when it was already a member
    pub fn insert(&mut self, room: Room) -> bool {
        if self.rooms.contains(&room) {
            return false;
        }
        self.rooms.push(room);
        true
    }

    pub fn contains(&self, room: &Room) -> bool {
        self.rooms.contains(room)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }
}
