//! Ferryman - Gitter-Matrix room bridge core
//!
//! Keeps a set of Gitter rooms linked to Matrix rooms and relays messages
//! both ways: Gitter messages are reposted by per-user Matrix ghosts, edits
//! are rendered as compact diffs, and Matrix messages are sent to Gitter
//! under the sender's name and echoed to the other linked Matrix rooms.
//!
//! The Gitter and Matrix clients are supplied by the embedding application
//! through the traits in [`network`].

pub mod bridge;
pub mod common;
pub mod config;
pub mod logging;
pub mod network;
pub mod relay;

#[cfg(test)]
mod testing;

pub use bridge::{BridgedRoom, RoomLinks, RoomState};
pub use common::{BridgeError, BridgeResult, ConfigError, NetworkError, NetworkResult};
pub use config::{load_and_validate, Config};
pub use logging::init_logging;
pub use network::Services;
pub use relay::{FanOutReport, InboundOutcome};
