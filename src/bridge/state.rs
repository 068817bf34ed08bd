//! Bridged room lifecycle.
//!
//! `Unstarted -> Active -> Stopping -> Stopped`, with a shortcut from
//! `Unstarted` straight to `Stopped` for a room that loses its last link
//! before it ever joined. Nothing leaves `Stopped`.

use std::fmt;

/// Lifecycle state of a bridged room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    Unstarted,
    Active,
    Stopping,
    Stopped,
}

impl RoomState {
    /// Whether `self -> next` is a legal transition.
    pub fn allows(self, next: RoomState) -> bool {
        matches!(
            (self, next),
            (RoomState::Unstarted, RoomState::Active)
                | (RoomState::Unstarted, RoomState::Stopped)
                | (RoomState::Active, RoomState::Stopping)
                | (RoomState::Stopping, RoomState::Stopped)
        )
    }

    /// Stopping or stopped: the room will never relay again.
    pub fn is_shut_down(self) -> bool {
        matches!(self, RoomState::Stopping | RoomState::Stopped)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomState::Unstarted => "unstarted",
            RoomState::Active => "active",
            RoomState::Stopping => "stopping",
            RoomState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for RoomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
