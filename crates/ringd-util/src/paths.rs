//! Default paths for ringd components
//!
//! Paths are user-writable by default (no root required):
//! - Config: `$XDG_CONFIG_HOME/ringd/config.toml` or `~/.config/ringd/config.toml`
//! - Logs: `$XDG_STATE_HOME/ringd` or `~/.local/state/ringd`

use std::path::PathBuf;

/// Environment variable for overriding the config path
pub const RINGD_CONFIG_ENV: &str = "RINGD_CONFIG";

/// Application subdirectory name
const APP_DIR: &str = "ringd";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Get the default config path.
///
/// Order of precedence:
/// 1. `$RINGD_CONFIG` environment variable (if set)
/// 2. `$XDG_CONFIG_HOME/ringd/config.toml` (if XDG_CONFIG_HOME is set)
/// 3. `~/.config/ringd/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(RINGD_CONFIG_ENV) {
        return PathBuf::from(path);
    }

    config_path_without_env()
}

/// Get the config path without checking RINGD_CONFIG env var.
/// Used for default values where the env var is checked separately.
pub fn config_path_without_env() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home)
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join(CONFIG_FILENAME)
}

/// Get the default log directory.
///
/// Order of precedence:
/// 1. `$XDG_STATE_HOME/ringd` (if XDG_STATE_HOME is set)
/// 2. `~/.local/state/ringd` (fallback)
pub fn default_log_dir() -> PathBuf {
    if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(state_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("state")
            .join(APP_DIR);
    }

    PathBuf::from("/tmp").join(APP_DIR).join("logs")
}
