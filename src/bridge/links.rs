//! Matrix rooms linked to one Gitter room.

use tracing::warn;

/// Explicit links plus the optional portal room.
///
/// Duplicate links are not rejected here; the link table above us owns that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomLinks {
    linked: Vec<String>,
    portal: Option<String>,
}

impl RoomLinks {
    pub fn new(linked: Vec<String>, portal: Option<String>) -> Self {
        Self { linked, portal }
    }

    pub fn link(&mut self, room_id: impl Into<String>) {
        self.linked.push(room_id.into());
    }

    /// Remove every link to `room_id`. Returns whether anything was removed.
    pub fn unlink(&mut self, room_id: &str) -> bool {
        let before = self.linked.len();
        self.linked.retain(|id| id != room_id);
        self.linked.len() != before
    }

    pub fn linked(&self) -> &[String] {
        &self.linked
    }

    pub fn portal(&self) -> Option<&str> {
        self.portal.as_deref()
    }

    /// Set the portal room, returning the one it replaced.
    pub fn set_portal(&mut self, room_id: impl Into<String>) -> Option<String> {
        let room_id = room_id.into();
        if let Some(ref current) = self.portal {
            if *current != room_id {
                warn!(
                    "Replacing portal room {} with {} while still set",
                    current, room_id
                );
            }
        }
        self.portal.replace(room_id)
    }

    pub fn clear_portal(&mut self) -> Option<String> {
        self.portal.take()
    }

    /// Fan-out targets: links in link order, then the portal.
    pub fn all_room_ids(&self) -> Vec<String> {
        let mut ids = self.linked.clone();
        if let Some(ref portal) = self.portal {
            ids.push(portal.clone());
        }
        ids
    }

    /// No links and no portal: nothing on Matrix is listening.
    pub fn is_empty(&self) -> bool {
        self.linked.is_empty() && self.portal.is_none()
    }
}
