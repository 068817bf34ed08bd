//! Configuration validation.
//!
//! Validates configuration values and reports every problem at once.

use std::collections::HashSet;

use crate::common::error::ConfigError;
use crate::config::types::Config;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(format!(
            "logging.level '{}' is invalid (use: trace, debug, info, warn, error)",
            config.logging.level
        ));
    }

    if config.relay.edit_marker.trim().is_empty() {
        errors.push("relay.edit_marker must not be empty".to_string());
    }
    if config.relay.removed_color.trim().is_empty() {
        errors.push("relay.removed_color must not be empty".to_string());
    }
    if config.relay.added_color.trim().is_empty() {
        errors.push("relay.added_color must not be empty".to_string());
    }

    let mut seen = HashSet::new();
    for (i, room) in config.rooms.iter().enumerate() {
        if room.gitter.trim().is_empty() {
            errors.push(format!("rooms[{}].gitter is required", i));
        } else if !seen.insert(room.gitter.to_lowercase()) {
            errors.push(format!(
                "rooms[{}].gitter '{}' is configured more than once",
                i, room.gitter
            ));
        }

        for (j, matrix_id) in room.matrix.iter().enumerate() {
            if !is_matrix_room_id(matrix_id) {
                errors.push(format!(
                    "rooms[{}].matrix[{}] '{}' is not a Matrix room ID",
                    i, j, matrix_id
                ));
            }
        }

        if let Some(ref portal) = room.portal {
            if !is_matrix_room_id(portal) {
                errors.push(format!(
                    "rooms[{}].portal '{}' is not a Matrix room ID",
                    i, portal
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}

/// `!opaque:server`
fn is_matrix_room_id(id: &str) -> bool {
    match id.strip_prefix('!') {
        Some(rest) => rest.split_once(':').is_some_and(|(local, server)| {
            !local.is_empty() && !server.is_empty()
        }),
        None => false,
    }
}
