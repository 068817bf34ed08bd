//! Event pump feeding one room's Gitter streams into its inbound relay.

use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, error, info};

use crate::common::{PresenceEvent, StreamEvent};
use crate::relay::InboundRelay;

/// Receivers and shutdown signal for one active room.
pub(crate) struct RoomStreams {
    pub messages: mpsc::UnboundedReceiver<StreamEvent>,
    pub presence: mpsc::UnboundedReceiver<PresenceEvent>,
    pub shutdown_rx: watch::Receiver<bool>,
}

/// Process stream events one at a time, in arrival order, until shutdown
/// or until the message stream closes.
///
/// Shutdown is checked before every event; an event already being relayed
/// runs to completion.
pub(crate) async fn run_room_pump(room_name: String, relay: Arc<Mutex<InboundRelay>>, streams: RoomStreams) {
    let RoomStreams {
        mut messages,
        mut presence,
        mut shutdown_rx,
    } = streams;
    let mut presence_open = true;

    loop {
        tokio::select! {
            biased;
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    debug!(room = %room_name, "Shutdown signal received");
                    break;
                }
            }
            event = messages.recv() => match event {
                Some(event) => {
                    let mut relay = relay.lock().await;
                    if let Err(e) = relay.on_inbound_remote_event(event).await {
                        error!(room = %room_name, "Failed to relay Gitter message: {}", e);
                    }
                }
                None => {
                    debug!(room = %room_name, "Gitter message stream closed");
                    break;
                }
            },
            event = presence.recv(), if presence_open => match event {
                Some(event) => relay.lock().await.on_presence_event(event).await,
                None => presence_open = false,
            },
        }
    }

    info!(room = %room_name, "Room event pump ended");
}
