//! Configuration type definitions.

use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// How relayed messages are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelayConfig {
    /// Marker put in front of reconstructed edits.
    #[serde(default = "default_edit_marker")]
    pub edit_marker: String,
    /// Font color for the replaced text of an edit.
    #[serde(default = "default_removed_color")]
    pub removed_color: String,
    /// Font color for the replacement text of an edit.
    #[serde(default = "default_added_color")]
    pub added_color: String,
    /// Drop the leading `@sender` from Gitter status messages.
    #[serde(default = "default_true")]
    pub strip_self_mentions: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            edit_marker: default_edit_marker(),
            removed_color: default_removed_color(),
            added_color: default_added_color(),
            strip_self_mentions: true,
        }
    }
}

/// Initial links for one Gitter room.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomConfig {
    /// Gitter room name, e.g. `matrix-org/gitter`.
    pub gitter: String,
    /// Linked Matrix room IDs.
    #[serde(default)]
    pub matrix: Vec<String>,
    /// Optional portal room ID.
    #[serde(default)]
    pub portal: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_edit_marker() -> String {
    "(edited)".to_string()
}

fn default_removed_color() -> String {
    "red".to_string()
}

fn default_added_color() -> String {
    "green".to_string()
}

fn default_true() -> bool {
    true
}
