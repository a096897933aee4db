//! Goal model.
//!
//! Goals are owned by the goal store; the reminder engine reads them and
//! never mutates them. A goal may or may not carry a deadline -- only goals
//! with a deadline are ever considered for reminders.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Maximum goal title length, in characters.
pub const MAX_TITLE_LEN: usize = 500;

/// A user goal, optionally with a deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub deadline: Option<DateTime<Utc>>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Create a new goal with a fresh id.
    ///
    /// # Errors
    /// Returns an error if the title is empty after trimming or exceeds
    /// [`MAX_TITLE_LEN`] characters.
    pub fn new(
        user_id: impl Into<String>,
        title: &str,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<Self, ValidationError> {
        let title = validate_title(title)?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            title,
            deadline,
            completed: false,
            created_at: Utc::now(),
        })
    }

    /// Time left until the deadline, if the goal has one.
    ///
    /// Negative durations mean the deadline has passed.
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.deadline.map(|deadline| deadline - now)
    }
}

/// Trim and validate a goal title.
pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "title".to_string(),
            message: "goal title cannot be empty".to_string(),
        });
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::InvalidValue {
            field: "title".to_string(),
            message: format!("goal title cannot exceed {MAX_TITLE_LEN} characters"),
        });
    }
    Ok(title.to_string())
}
