//! Common utilities and types shared across the crate.

pub mod error;
pub mod messages;
pub mod metrics;

pub use error::{BridgeError, BridgeResult, ConfigError, NetworkError, NetworkResult};
pub use messages::{
    HomeMessage, HomeMessageContent, Operation, PresenceEvent, PresenceStatus, RemoteMessage,
    RemoteUser, StreamEvent,
};
pub use metrics::{CounterSet, Counters, Side};
