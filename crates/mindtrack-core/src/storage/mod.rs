pub mod config;
pub mod goal_db;
pub mod migrations;
pub mod notification_db;

pub use config::{Config, ReminderConfig};
pub use goal_db::GoalDb;
pub use notification_db::NotificationDb;

use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Returns `~/.config/mindtrack[-dev]/` based on MINDTRACK_ENV.
///
/// Set MINDTRACK_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("MINDTRACK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("mindtrack-dev")
    } else {
        base_dir.join("mindtrack")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Parse an RFC 3339 timestamp, falling back to the current time.
pub(crate) fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Parse an optional RFC 3339 timestamp, dropping unparseable values.
pub(crate) fn parse_datetime_opt(dt_str: Option<String>) -> Option<DateTime<Utc>> {
    dt_str
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
