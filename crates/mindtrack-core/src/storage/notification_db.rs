//! SQLite-based notification storage.
//!
//! Holds the notification inbox. The reminder engine only ever inserts and
//! queries by recency; the read/unread operations back the inbox surface.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::DatabaseError;
use crate::notification::{Notification, NotificationKind};
use crate::reminder::{NotificationStore, ReminderTier, StoreError};

use super::{data_dir, migrations, parse_datetime_fallback};

/// Inbox page size, newest first.
const LIST_LIMIT: i64 = 50;

fn row_to_notification(row: &rusqlite::Row) -> Result<Notification, rusqlite::Error> {
    let kind: String = row.get(3)?;
    let tier: Option<String> = row.get(5)?;
    let created_at: String = row.get(7)?;
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        message: row.get(2)?,
        kind: NotificationKind::parse(&kind).unwrap_or(NotificationKind::System),
        goal_id: row.get(4)?,
        tier: tier.as_deref().and_then(ReminderTier::parse),
        read: row.get(6)?,
        created_at: parse_datetime_fallback(&created_at),
    })
}

const SELECT_COLUMNS: &str = "id, user_id, message, kind, goal_id, tier, read, created_at";

/// SQLite database for notifications.
pub struct NotificationDb {
    conn: Connection,
}

impl NotificationDb {
    /// Open the database at `~/.config/mindtrack/mindtrack.db`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()?.join("mindtrack.db");
        Self::open_at(&path)
    }

    /// Open a database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_conn(conn)
    }

    /// Open an in-memory database (for tests and ephemeral use).
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        Self::from_conn(conn)
    }

    fn from_conn(conn: Connection) -> Result<Self, DatabaseError> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Persist a notification record.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn insert(&self, n: &Notification) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO notifications (id, user_id, message, kind, goal_id, tier, read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                n.id,
                n.user_id,
                n.message,
                n.kind.as_str(),
                n.goal_id,
                n.tier.map(ReminderTier::as_str),
                n.read,
                n.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Notifications for one (user, goal, kind) created at or after `since`,
    /// newest first.
    pub fn recent_for_goal(
        &self,
        user_id: &str,
        goal_id: &str,
        kind: NotificationKind,
        since: DateTime<Utc>,
    ) -> Result<Vec<Notification>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS}
             FROM notifications
             WHERE user_id = ?1 AND goal_id = ?2 AND kind = ?3 AND created_at >= ?4
             ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map(
            params![user_id, goal_id, kind.as_str(), since.to_rfc3339()],
            row_to_notification,
        )?;
        rows.collect()
    }

    /// The user's inbox: most recent notifications, capped at 50.
    pub fn list_for_user(&self, user_id: &str) -> Result<Vec<Notification>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS}
             FROM notifications
             WHERE user_id = ?1
             ORDER BY created_at DESC
             LIMIT ?2"
        ))?;
        let rows = stmt.query_map(params![user_id, LIST_LIMIT], row_to_notification)?;
        rows.collect()
    }

    /// Unread notifications for a user, newest first.
    pub fn unread_for_user(&self, user_id: &str) -> Result<Vec<Notification>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS}
             FROM notifications
             WHERE user_id = ?1 AND read = 0
             ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map(params![user_id], row_to_notification)?;
        rows.collect()
    }

    /// Mark one notification as read. Returns whether it existed.
    pub fn mark_read(&self, id: &str) -> Result<bool, rusqlite::Error> {
        let changed = self
            .conn
            .execute("UPDATE notifications SET read = 1 WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// Mark all of a user's notifications as read. Returns how many changed.
    pub fn mark_all_read(&self, user_id: &str) -> Result<usize, rusqlite::Error> {
        self.conn.execute(
            "UPDATE notifications SET read = 1 WHERE user_id = ?1 AND read = 0",
            params![user_id],
        )
    }

    /// Delete a notification. Returns whether it existed.
    pub fn delete(&self, id: &str) -> Result<bool, rusqlite::Error> {
        let changed = self
            .conn
            .execute("DELETE FROM notifications WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}

impl NotificationStore for NotificationDb {
    fn find_recent(
        &self,
        user_id: &str,
        goal_id: &str,
        kind: NotificationKind,
        since: DateTime<Utc>,
    ) -> Result<Vec<Notification>, StoreError> {
        self.recent_for_goal(user_id, goal_id, kind, since)
            .map_err(|e| StoreError::Read(e.to_string()))
    }

    fn create(&self, notification: &Notification) -> Result<(), StoreError> {
        self.insert(notification)
            .map_err(|e| StoreError::Write(e.to_string()))
    }
}
