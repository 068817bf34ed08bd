//! Configuration parsing and types.

pub mod env;
pub mod parser;
pub mod types;
pub mod validate;

use std::path::Path;

use tracing::debug;

pub use parser::{load_config, load_config_str};
pub use types::*;
pub use validate::validate_config;

/// Load a config file, apply environment overrides and validate the result.
pub fn load_and_validate(path: impl AsRef<Path>) -> anyhow::Result<Config> {
    let config = env::apply_env_overrides(load_config(path)?);
    validate_config(&config)?;
    debug!("Loaded configuration for {} rooms", config.rooms.len());
    Ok(config)
}
