//! Environment variable overrides for configuration.
//!
//! - `FERRYMAN_CONFIG` - config file path
//! - `FERRYMAN_LOG_LEVEL` - default log level

use std::env;

use crate::config::types::Config;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "FERRYMAN";

/// Apply environment variable overrides to a config.
pub fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(level) = env::var(format!("{}_LOG_LEVEL", ENV_PREFIX)) {
        if !level.is_empty() {
            config.logging.level = level;
        }
    }

    config
}

/// Get the config file path from environment or use default.
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| "ferryman.conf".to_string())
}
