//! Service configuration
//!
//! TOML config for the service itself: notification channel, alarm volume,
//! and an optional default sound file. Alarm *state* is never persisted; the
//! session lives and dies with the process.

use ringd_host_api::ChannelSpec;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Service configuration, all fields optional in the file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Notification channel registration data
    #[serde(default)]
    pub channel: ChannelSpec,

    /// Gain for alarm playback, in 0.0..=1.0
    #[serde(default = "default_alarm_volume")]
    pub alarm_volume: f32,

    /// Sound file used when a start trigger carries no audio source.
    /// Without it, the built-in tone plays.
    #[serde(default)]
    pub default_sound: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel: ChannelSpec::default(),
            alarm_volume: default_alarm_volume(),
            default_sound: None,
        }
    }
}

fn default_alarm_volume() -> f32 {
    1.0
}

/// Load configuration, falling back to defaults when the file is absent
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;

    if !(0.0..=1.0).contains(&config.alarm_volume) {
        return Err(ConfigError::Invalid(format!(
            "alarm_volume must be within 0.0..=1.0, got {}",
            config.alarm_volume
        )));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringd_host_api::ChannelImportance;
    use std::io::Write;

    #[test]
    fn parse_full_config() {
        let config = parse_config(
            r#"
            alarm_volume = 0.8
            default_sound = "/home/user/tone.ogg"

            [channel]
            id = "alarm_channel"
            name = "Alarm"
            importance = "high"
        "#,
        )
        .unwrap();

        assert_eq!(config.alarm_volume, 0.8);
        assert_eq!(
            config.default_sound.as_deref(),
            Some(Path::new("/home/user/tone.ogg"))
        );
        assert_eq!(config.channel.importance, ChannelImportance::High);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.alarm_volume, 1.0);
        assert!(config.default_sound.is_none());
        assert_eq!(config.channel.id, "alarm_channel");
    }

    #[test]
    fn reject_out_of_range_volume() {
        let result = parse_config("alarm_volume = 1.5");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.alarm_volume, 1.0);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "alarm_volume = 0.5").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.alarm_volume, 0.5);
    }
}
