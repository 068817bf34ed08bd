//! Error types for the bridge.

use thiserror::Error;

use crate::bridge::RoomState;

/// Failure reported by one of the network collaborators (Gitter or Matrix side).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Network unreachable")]
    Unreachable,

    #[error("Request rejected: {message}")]
    Rejected { message: String },

    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("{0}")]
    Other(String),
}

/// Errors surfaced by a bridged room to its caller.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Failed to resolve own Gitter identity: {0}")]
    IdentityResolution(#[source] NetworkError),

    #[error("Failed to join Gitter room '{room}': {source}")]
    Join {
        room: String,
        #[source]
        source: NetworkError,
    },

    #[error("Failed to map Gitter user '{user}': {source}")]
    UserMapping {
        user: String,
        #[source]
        source: NetworkError,
    },

    #[error("Failed to send to Gitter room '{room}': {source}")]
    RemoteSend {
        room: String,
        #[source]
        source: NetworkError,
    },

    #[error("Cannot {operation} while room is {state}")]
    InvalidState {
        operation: &'static str,
        state: RoomState,
    },

    #[error("Room '{room}' is stopped")]
    Stopped { room: String },
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Result type alias for collaborator calls.
pub type NetworkResult<T> = std::result::Result<T, NetworkError>;

/// Result type alias for bridged room operations.
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;
