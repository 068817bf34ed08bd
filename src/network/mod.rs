//! Interfaces to the two chat networks.
//!
//! The bridge core never talks to Gitter or Matrix directly; everything goes
//! through these traits so the embedding application owns sessions, retries
//! and persistence.

pub mod home;
pub mod remote;

use std::sync::Arc;

pub use home::{GhostUser, HomeSender, NameMangler, UserMapper};
pub use remote::{IdentityResolver, RemoteClient, RemoteRoom};

use crate::common::Counters;

/// Bundle of collaborators shared by every bridged room.
#[derive(Clone)]
pub struct Services {
    pub identity: Arc<dyn IdentityResolver>,
    pub remote: Arc<dyn RemoteClient>,
    /// The bridge bot's own Matrix sender.
    pub bot: Arc<dyn HomeSender>,
    pub users: Arc<dyn UserMapper>,
    pub mangler: Arc<dyn NameMangler>,
    pub counters: Arc<dyn Counters>,
}
