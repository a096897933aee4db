//! Notification model.
//!
//! Notifications are append-only from the engine's point of view: the
//! reminder engine creates them and never mutates or deletes existing ones.
//! Read/unread state belongs to the inbox operations in
//! [`crate::storage::notification_db`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::goal::Goal;
use crate::reminder::ReminderTier;

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Deadline reminder produced by the engine.
    GoalReminder,
    /// Anything else (account events, announcements, ...).
    System,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::GoalReminder => "goal_reminder",
            NotificationKind::System => "system",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "goal_reminder" => Some(NotificationKind::GoalReminder),
            "system" => Some(NotificationKind::System),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted notification record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub message: String,
    pub kind: NotificationKind,
    /// Goal this notification refers to, for reminders.
    pub goal_id: Option<String>,
    /// Reminder tier, set only for `goal_reminder` notifications. This is
    /// the dedup key: the engine fires each (goal, tier) at most once per
    /// tier window.
    pub tier: Option<ReminderTier>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Build a deadline reminder for `goal` at the given tier.
    ///
    /// `now` is the generation instant of the scan, so that a whole scan
    /// stamps its reminders consistently.
    pub fn reminder(goal: &Goal, tier: ReminderTier, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: goal.user_id.clone(),
            message: tier.message(&goal.title),
            kind: NotificationKind::GoalReminder,
            goal_id: Some(goal.id.clone()),
            tier: Some(tier),
            read: false,
            created_at: now,
        }
    }

    /// Build a system notification for `user_id`.
    pub fn system(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            message: message.into(),
            kind: NotificationKind::System,
            goal_id: None,
            tier: None,
            read: false,
            created_at: Utc::now(),
        }
    }
}
