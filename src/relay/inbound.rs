//! Gitter -> Matrix relay for one bridged room.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::bridge::links::RoomLinks;
use crate::common::messages::MSGTYPE_EMOTE;
use crate::common::metrics::RECEIVED_MESSAGES;
use crate::common::{
    BridgeError, BridgeResult, HomeMessageContent, Operation, PresenceEvent, PresenceStatus,
    RemoteMessage, RemoteUser, Side, StreamEvent,
};
use crate::config::RelayConfig;
use crate::network::Services;

use super::diff::{diff_edit, EditCache};
use super::formatter::{strip_self_mention, strip_self_mention_html};
use super::{fan_out, FanOutReport};

/// Why a live event was dropped without relaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Event carried no message model.
    NoModel,
    /// Message model had no sender.
    NoSender,
    /// Gitter showing us our own relayed message.
    Reflection,
    /// Neither a create nor an update.
    UnsupportedOperation,
}

/// What happened to one live event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundOutcome {
    Ignored(IgnoreReason),
    Relayed(FanOutReport),
}

/// Per-room state for the inbound direction.
///
/// Owned by the room's event pump; the edit cache is only ever touched here.
pub struct InboundRelay {
    room_name: String,
    remote_room_id: String,
    own_user_id: String,
    services: Services,
    config: RelayConfig,
    links: watch::Receiver<RoomLinks>,
    edits: EditCache,
}

impl InboundRelay {
    pub fn new(
        room_name: impl Into<String>,
        remote_room_id: impl Into<String>,
        own_user_id: impl Into<String>,
        services: Services,
        config: RelayConfig,
        links: watch::Receiver<RoomLinks>,
    ) -> Self {
        Self {
            room_name: room_name.into(),
            remote_room_id: remote_room_id.into(),
            own_user_id: own_user_id.into(),
            services,
            config,
            links,
            edits: EditCache::new(),
        }
    }

    /// Handle one event from the Gitter message stream.
    pub async fn on_inbound_remote_event(&mut self, event: StreamEvent) -> BridgeResult<InboundOutcome> {
        let Some(message) = event.model else {
            return Ok(InboundOutcome::Ignored(IgnoreReason::NoModel));
        };
        let Some(from) = message.from_user.clone() else {
            debug!(room = %self.room_name, "Ignoring message without sender");
            return Ok(InboundOutcome::Ignored(IgnoreReason::NoSender));
        };
        if from.id == self.own_user_id {
            debug!(room = %self.room_name, "Ignoring reflection of our own message");
            return Ok(InboundOutcome::Ignored(IgnoreReason::Reflection));
        }
        if !matches!(event.operation, Operation::Create | Operation::Update) {
            debug!(room = %self.room_name, operation = ?event.operation, "Ignoring event");
            return Ok(InboundOutcome::Ignored(IgnoreReason::UnsupportedOperation));
        }

        self.relay_message(message, from)
            .await
            .map(InboundOutcome::Relayed)
    }

    async fn relay_message(&mut self, message: RemoteMessage, from: RemoteUser) -> BridgeResult<FanOutReport> {
        let counters = self.services.counters.clone();
        counters.inc_counter(RECEIVED_MESSAGES, Side::Remote);
        info!(
            room = %self.room_name,
            "gitter->{} from {}: {}", self.room_name, from.username, message.text
        );

        let previous = self.edits.record(&from.id, &message);

        let ghost = self
            .services
            .users
            .map_remote_user(&from)
            .await
            .map_err(|source| BridgeError::UserMapping {
                user: from.username.clone(),
                source,
            })?;

        // A broken avatar or profile must not stop the message itself.
        if let Err(e) = ghost.update(&from).await {
            warn!(room = %self.room_name, "Updating user {} failed: {}", from.username, e);
        }

        let content = build_home_content(&message, &from.username, previous.as_ref(), &self.config);
        let targets = self.links.borrow().all_room_ids();
        let intent = ghost.send_intent();

        Ok(fan_out(intent.as_ref(), &targets, &content, counters.as_ref(), Side::Home).await)
    }

    /// Handle one event from the Gitter presence stream.
    pub async fn on_presence_event(&self, event: PresenceEvent) {
        match self.services.users.find_remote_user(&event.user_id).await {
            Ok(Some(ghost)) => {
                ghost
                    .set_room_presence(&self.remote_room_id, event.status == PresenceStatus::In)
                    .await;
            }
            Ok(None) => {
                debug!(room = %self.room_name, "No ghost for Gitter user {}", event.user_id);
            }
            Err(e) => {
                warn!(room = %self.room_name, "Presence lookup for {} failed: {}", event.user_id, e);
            }
        }
    }
}

/// Build the Matrix content for a Gitter message.
///
/// `previous` is the version this message revises, if any; edits are rendered
/// as a diff and skip the rich-text and emote handling.
pub fn build_home_content(
    message: &RemoteMessage,
    username: &str,
    previous: Option<&RemoteMessage>,
    config: &RelayConfig,
) -> HomeMessageContent {
    if let Some(previous) = previous {
        let diff = diff_edit(&previous.text, &message.text);
        return HomeMessageContent::text(diff.body(config)).with_html(diff.formatted_body(config));
    }

    let mut content = HomeMessageContent::text(message.text.clone());
    if !message.html.is_empty() && message.html != message.text {
        content = content.with_html(message.html.clone());
    }

    if message.status {
        content.msgtype = MSGTYPE_EMOTE.to_string();

        if config.strip_self_mentions {
            content.body = strip_self_mention(&content.body, username);
            content.formatted_body = content
                .formatted_body
                .map(|html| strip_self_mention_html(&html, username));
        }
    }

    content
}
