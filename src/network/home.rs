//! Matrix-side collaborators.

use std::sync::Arc;

use async_trait::async_trait;

use crate::common::{HomeMessageContent, NetworkResult, RemoteUser};

/// Something that can post into Matrix rooms: the bridge bot or a ghost's intent.
#[async_trait]
pub trait HomeSender: Send + Sync {
    async fn send_message(&self, room_id: &str, content: &HomeMessageContent) -> NetworkResult<()>;
}

/// Matrix ghost representing a Gitter user.
#[async_trait]
pub trait GhostUser: Send + Sync {
    /// Sync display name and avatar from the Gitter profile.
    async fn update(&self, from: &RemoteUser) -> NetworkResult<()>;

    async fn set_room_presence(&self, remote_room_id: &str, online: bool);

    fn send_intent(&self) -> Arc<dyn HomeSender>;
}

/// Maps Gitter users to their Matrix ghosts.
#[async_trait]
pub trait UserMapper: Send + Sync {
    /// Look up or create the ghost for a message sender.
    async fn map_remote_user(&self, from: &RemoteUser) -> NetworkResult<Arc<dyn GhostUser>>;

    /// Look up an already known ghost by Gitter user ID.
    async fn find_remote_user(&self, user_id: &str) -> NetworkResult<Option<Arc<dyn GhostUser>>>;
}

/// Turns a Matrix user ID into the label shown on Gitter.
pub trait NameMangler: Send + Sync {
    fn mangle_home_user_id(&self, user_id: &str) -> String;
}
