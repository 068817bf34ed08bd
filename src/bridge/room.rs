//! A Gitter room bridged into one or more Matrix rooms.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::common::{BridgeError, BridgeResult, HomeMessage, StreamEvent};
use crate::config::{RelayConfig, RoomConfig};
use crate::network::{RemoteRoom, Services};
use crate::relay::{relay_home_message, FanOutReport, InboundOutcome, InboundRelay};

use super::links::RoomLinks;
use super::pump::{run_room_pump, RoomStreams};
use super::state::RoomState;

/// Remote call counter names.
const CALL_ROOM_JOIN: &str = "room.join";
const CALL_ROOM_LEAVE: &str = "room.leave";

/// Everything that only exists while the room is joined.
struct ActiveRoom {
    room: Arc<dyn RemoteRoom>,
    own_user_id: String,
    relay: Arc<Mutex<InboundRelay>>,
    shutdown_tx: watch::Sender<bool>,
}

enum Lifecycle {
    Unstarted,
    Active(ActiveRoom),
    Stopping,
    Stopped,
}

impl Lifecycle {
    fn state(&self) -> RoomState {
        match self {
            Lifecycle::Unstarted => RoomState::Unstarted,
            Lifecycle::Active(_) => RoomState::Active,
            Lifecycle::Stopping => RoomState::Stopping,
            Lifecycle::Stopped => RoomState::Stopped,
        }
    }
}

/// One Gitter room and the Matrix rooms it is linked to.
///
/// Link and unlink calls must be serialized by the caller; wrap the room in a
/// mutex when several tasks manage it.
pub struct BridgedRoom {
    remote_room_name: String,
    services: Services,
    config: RelayConfig,
    links: watch::Sender<RoomLinks>,
    lifecycle: Lifecycle,
}

impl BridgedRoom {
    pub fn new(remote_room_name: impl Into<String>, services: Services, config: RelayConfig) -> Self {
        let (links, _) = watch::channel(RoomLinks::default());
        Self {
            remote_room_name: remote_room_name.into(),
            services,
            config,
            links,
            lifecycle: Lifecycle::Unstarted,
        }
    }

    /// Build an unstarted room with the links from its config entry.
    pub fn from_config(room: &RoomConfig, services: Services, config: RelayConfig) -> Self {
        let bridged = Self::new(room.gitter.clone(), services, config);
        bridged
            .links
            .send_replace(RoomLinks::new(room.matrix.clone(), room.portal.clone()));
        bridged
    }

    pub fn remote_room_name(&self) -> &str {
        &self.remote_room_name
    }

    pub fn state(&self) -> RoomState {
        self.lifecycle.state()
    }

    /// Our own Gitter user ID, known only while active.
    pub fn own_remote_user_id(&self) -> Option<&str> {
        match &self.lifecycle {
            Lifecycle::Active(active) => Some(&active.own_user_id),
            _ => None,
        }
    }

    /// Resolve our Gitter identity, join the room and start relaying.
    ///
    /// On failure the room stays unstarted and the call may be retried. A room
    /// with no links and no portal is stopped instead of joined.
    pub async fn start_and_join(&mut self) -> BridgeResult<()> {
        if !matches!(self.lifecycle, Lifecycle::Unstarted) {
            return Err(BridgeError::InvalidState {
                operation: "start and join",
                state: self.state(),
            });
        }
        if self.links.borrow().is_empty() {
            warn!(room = %self.remote_room_name, "No Matrix rooms linked, not joining");
            self.transition(Lifecycle::Stopped);
            return Err(BridgeError::Stopped {
                room: self.remote_room_name.clone(),
            });
        }

        // Needed to recognise reflections of the messages we send.
        let own_user_id = self
            .services
            .identity
            .resolve_own_remote_identity()
            .await
            .map_err(BridgeError::IdentityResolution)?;

        self.services.counters.inc_remote_call_counter(CALL_ROOM_JOIN);
        let room = self
            .services
            .remote
            .join(&self.remote_room_name)
            .await
            .map_err(|source| BridgeError::Join {
                room: self.remote_room_name.clone(),
                source,
            })?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let streams = RoomStreams {
            messages: room.subscribe_messages(),
            presence: room.subscribe_presence(),
            shutdown_rx,
        };
        let relay = Arc::new(Mutex::new(InboundRelay::new(
            self.remote_room_name.clone(),
            room.id(),
            own_user_id.clone(),
            self.services.clone(),
            self.config.clone(),
            self.links.subscribe(),
        )));

        tokio::spawn(run_room_pump(
            self.remote_room_name.clone(),
            relay.clone(),
            streams,
        ));

        info!(
            room = %self.remote_room_name,
            "Joined Gitter room as {}", own_user_id
        );
        self.transition(Lifecycle::Active(ActiveRoom {
            room,
            own_user_id,
            relay,
            shutdown_tx,
        }));
        Ok(())
    }

    /// Disconnect the streams and leave the Gitter room.
    ///
    /// A failed leave is logged; the room is stopped either way.
    pub async fn stop_and_leave(&mut self) -> BridgeResult<()> {
        let active = match std::mem::replace(&mut self.lifecycle, Lifecycle::Stopping) {
            Lifecycle::Active(active) => active,
            other => {
                let state = other.state();
                self.lifecycle = other;
                return Err(BridgeError::InvalidState {
                    operation: "stop and leave",
                    state,
                });
            }
        };
        debug!(room = %self.remote_room_name, "active -> stopping");

        // Disconnect first so nothing new arrives mid-teardown.
        active.room.disconnect();
        if let Err(e) = active.shutdown_tx.send(true) {
            debug!(room = %self.remote_room_name, "Event pump already gone: {}", e);
        }

        self.services.counters.inc_remote_call_counter(CALL_ROOM_LEAVE);
        if let Err(e) = active.room.remove_user(&active.own_user_id).await {
            warn!(room = %self.remote_room_name, "Failed to leave Gitter room: {}", e);
        }

        self.transition(Lifecycle::Stopped);
        info!(room = %self.remote_room_name, "Left Gitter room");
        Ok(())
    }

    pub fn link_home_room(&mut self, room_id: impl Into<String>) -> BridgeResult<()> {
        self.ensure_not_shut_down()?;
        let room_id = room_id.into();
        debug!(room = %self.remote_room_name, "Linking Matrix room {}", room_id);
        self.links.send_modify(|links| links.link(room_id));
        Ok(())
    }

    /// Remove a link; leaves Gitter once nothing on Matrix is listening.
    ///
    /// When that happens this does not return until the leave has finished.
    pub async fn unlink_home_room(&mut self, room_id: &str) -> BridgeResult<()> {
        let mut removed = false;
        self.links.send_modify(|links| removed = links.unlink(room_id));
        if !removed {
            debug!(room = %self.remote_room_name, "Matrix room {} was not linked", room_id);
        }
        self.stop_if_unused().await
    }

    pub fn set_portal_room(&mut self, room_id: impl Into<String>) -> BridgeResult<()> {
        self.ensure_not_shut_down()?;
        let room_id = room_id.into();
        self.links.send_modify(|links| {
            links.set_portal(room_id);
        });
        Ok(())
    }

    pub fn get_portal_room(&self) -> Option<String> {
        self.links.borrow().portal().map(str::to_string)
    }

    /// Remove the portal room, with the same teardown rule as unlinking.
    pub async fn clear_portal_room(&mut self) -> BridgeResult<()> {
        self.links.send_modify(|links| {
            links.clear_portal();
        });
        self.stop_if_unused().await
    }

    pub fn linked_home_room_ids(&self) -> Vec<String> {
        self.links.borrow().linked().to_vec()
    }

    /// Linked rooms in link order, then the portal.
    pub fn all_linked_room_ids(&self) -> Vec<String> {
        self.links.borrow().all_room_ids()
    }

    /// Relay one Gitter stream event. Normally called by the room's own pump.
    pub async fn on_inbound_remote_event(&self, event: StreamEvent) -> BridgeResult<InboundOutcome> {
        self.active("relay Gitter event")?
            .relay
            .lock()
            .await
            .on_inbound_remote_event(event)
            .await
    }

    /// Relay a Matrix message to Gitter and echo it to the other linked rooms.
    pub async fn on_outbound_home_message(&self, message: &HomeMessage) -> BridgeResult<FanOutReport> {
        let room = self.active("relay Matrix message")?.room.clone();
        let targets = self.all_linked_room_ids();
        relay_home_message(
            room.as_ref(),
            &self.remote_room_name,
            &self.services,
            &targets,
            message,
        )
        .await
    }

    fn active(&self, operation: &'static str) -> BridgeResult<&ActiveRoom> {
        match &self.lifecycle {
            Lifecycle::Active(active) => Ok(active),
            other => Err(BridgeError::InvalidState {
                operation,
                state: other.state(),
            }),
        }
    }

    fn ensure_not_shut_down(&self) -> BridgeResult<()> {
        if self.state().is_shut_down() {
            return Err(BridgeError::Stopped {
                room: self.remote_room_name.clone(),
            });
        }
        Ok(())
    }

    async fn stop_if_unused(&mut self) -> BridgeResult<()> {
        if !self.links.borrow().is_empty() {
            return Ok(());
        }

        match self.lifecycle {
            Lifecycle::Active(_) => self.stop_and_leave().await,
            Lifecycle::Unstarted => {
                self.transition(Lifecycle::Stopped);
                Ok(())
            }
            Lifecycle::Stopping | Lifecycle::Stopped => Ok(()),
        }
    }

    fn transition(&mut self, next: Lifecycle) {
        let from = self.lifecycle.state();
        let to = next.state();
        debug_assert!(
            from.allows(to),
            "illegal room transition {} -> {}",
            from,
            to
        );
        debug!(room = %self.remote_room_name, "{} -> {}", from, to);
        self.lifecycle = next;
    }
}
