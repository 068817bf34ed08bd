//! Canonical message types for bridge communication.
//!
//! Gitter-side shapes deserialize from the realtime stream JSON; the Matrix
//! side content serializes to the `m.room.message` event content.

use serde::{Deserialize, Serialize};

/// Matrix message type for plain text.
pub const MSGTYPE_TEXT: &str = "m.text";

/// Matrix message type for emotes (`/me`).
pub const MSGTYPE_EMOTE: &str = "m.emote";

/// Matrix `format` value signalling an HTML `formatted_body`.
pub const HTML_FORMAT: &str = "org.matrix.custom.html";

/// A Gitter user as attached to a message model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteUser {
    pub id: String,
    pub username: String,
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
}

/// A Gitter message model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteMessage {
    #[serde(rename = "fromUser")]
    pub from_user: Option<RemoteUser>,
    pub text: String,
    #[serde(default)]
    pub html: String,
    /// Status (`/me`) message.
    #[serde(default)]
    pub status: bool,
    /// Monotonic version; 1 is a new message, anything above is an edit.
    #[serde(default = "first_version")]
    pub v: u32,
}

fn first_version() -> u32 {
    1
}

/// Operation carried by a live stream event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    #[serde(other)]
    Other,
}

/// One event from a Gitter room's live message stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamEvent {
    pub operation: Operation,
    #[serde(default)]
    pub model: Option<RemoteMessage>,
}

/// Presence status of a user in a Gitter room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    In,
    Out,
}

/// One event from a Gitter room's presence stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PresenceEvent {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub status: PresenceStatus,
}

/// Content of a message sent into a Matrix room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeMessageContent {
    pub msgtype: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_body: Option<String>,
}

impl HomeMessageContent {
    /// Plain `m.text` content without a formatted body.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            msgtype: MSGTYPE_TEXT.to_string(),
            body: body.into(),
            format: None,
            formatted_body: None,
        }
    }

    /// Attach an HTML formatted body.
    pub fn with_html(mut self, formatted_body: impl Into<String>) -> Self {
        self.format = Some(HTML_FORMAT.to_string());
        self.formatted_body = Some(formatted_body.into());
        self
    }

    pub fn is_emote(&self) -> bool {
        self.msgtype == MSGTYPE_EMOTE
    }
}

/// A message posted by a Matrix user in one of the linked rooms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeMessage {
    /// Matrix room the message was posted in.
    pub room_id: String,
    /// Matrix user ID of the sender.
    pub user_id: String,
    pub content: HomeMessageContent,
}
