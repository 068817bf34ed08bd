//! Gitter-side collaborators.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::common::{NetworkResult, PresenceEvent, StreamEvent};

/// Resolves the bridge's own Gitter user ID.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve_own_remote_identity(&self) -> NetworkResult<String>;
}

/// Joins Gitter rooms on behalf of the bridge.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn join(&self, room_name: &str) -> NetworkResult<Arc<dyn RemoteRoom>>;
}

/// Live handle to a joined Gitter room.
///
/// Subscriptions hand back channel receivers; the stream ends when the
/// sender side is dropped, which [`RemoteRoom::disconnect`] must do.
#[async_trait]
pub trait RemoteRoom: Send + Sync {
    /// Gitter's internal room ID (not the `org/room` name).
    fn id(&self) -> &str;

    fn subscribe_messages(&self) -> mpsc::UnboundedReceiver<StreamEvent>;

    fn subscribe_presence(&self) -> mpsc::UnboundedReceiver<PresenceEvent>;

    async fn send(&self, text: &str) -> NetworkResult<()>;

    async fn send_status(&self, text: &str) -> NetworkResult<()>;

    async fn remove_user(&self, user_id: &str) -> NetworkResult<()>;

    fn disconnect(&self);
}
