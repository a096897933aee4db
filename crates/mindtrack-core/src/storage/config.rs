//! TOML-based application configuration.
//!
//! Stores the reminder engine settings and CLI defaults. Configuration is
//! stored at `~/.config/mindtrack/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

use super::data_dir;

/// Reminder engine configuration.
///
/// The tick interval is how often the scheduler fires; tier windows are
/// engine constants and independent of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between scheduler ticks.
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/mindtrack/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// User the CLI acts as when `--user` is not given.
    #[serde(default = "default_user")]
    pub default_user: String,
    #[serde(default)]
    pub reminders: ReminderConfig,
}

fn default_true() -> bool {
    true
}
fn default_tick_interval_secs() -> u64 {
    3600
}
fn default_user() -> String {
    "local".to_string()
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_interval_secs: default_tick_interval_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_user: default_user(),
            reminders: ReminderConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the default config on first run.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed, or
    /// if the default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning the default on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as a string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default_user" => Some(self.default_user.clone()),
            "reminders.enabled" => Some(self.reminders.enabled.to_string()),
            "reminders.tick_interval_secs" => Some(self.reminders.tick_interval_secs.to_string()),
            _ => None,
        }
    }

    /// Set a config value by dot-separated key and persist it.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "default_user" => {
                if value.trim().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: "user cannot be empty".to_string(),
                    });
                }
                self.default_user = value.trim().to_string();
            }
            "reminders.enabled" => {
                self.reminders.enabled =
                    value.parse::<bool>().map_err(|_| ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: format!("cannot parse '{value}' as bool"),
                    })?;
            }
            "reminders.tick_interval_secs" => {
                let secs = value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("cannot parse '{value}' as seconds"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: "tick interval must be at least 1 second".to_string(),
                    });
                }
                self.reminders.tick_interval_secs = secs;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        self.save()
    }
}
