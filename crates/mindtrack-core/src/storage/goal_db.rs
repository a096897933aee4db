//! SQLite-based goal storage.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};

use crate::error::DatabaseError;
use crate::goal::Goal;
use crate::reminder::{GoalStore, StoreError};

use super::{data_dir, migrations, parse_datetime_fallback, parse_datetime_opt};

fn row_to_goal(row: &rusqlite::Row) -> Result<Goal, rusqlite::Error> {
    let deadline: Option<String> = row.get(3)?;
    let created_at: String = row.get(5)?;
    Ok(Goal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        deadline: parse_datetime_opt(deadline),
        completed: row.get(4)?,
        created_at: parse_datetime_fallback(&created_at),
    })
}

/// SQLite database for goals.
pub struct GoalDb {
    conn: Connection,
}

impl GoalDb {
    /// Open the database at `~/.config/mindtrack/mindtrack.db`.
    ///
    /// Creates the database file and schema if they don't exist.
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

    /// Persist a new goal.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn create_goal(&self, goal: &Goal) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO goals (id, user_id, title, deadline, completed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                goal.id,
                goal.user_id,
                goal.title,
                goal.deadline.map(|d| d.to_rfc3339()),
                goal.completed,
                goal.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// All goals for a user, newest first.
    pub fn list_goals(&self, user_id: &str) -> Result<Vec<Goal>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, deadline, completed, created_at
             FROM goals
             WHERE user_id = ?1
             ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(params![user_id], row_to_goal)?;
        rows.collect()
    }

    /// Set the completion flag. Returns whether the goal existed.
    pub fn set_completed(&self, id: &str, completed: bool) -> Result<bool, rusqlite::Error> {
        let changed = self.conn.execute(
            "UPDATE goals SET completed = ?2 WHERE id = ?1",
            params![id, completed],
        )?;
        Ok(changed > 0)
    }

    /// Delete a goal. Returns whether the goal existed.
    pub fn delete_goal(&self, id: &str) -> Result<bool, rusqlite::Error> {
        let changed = self
            .conn
            .execute("DELETE FROM goals WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn due_soon(&self, now: DateTime<Utc>) -> Result<Vec<Goal>, rusqlite::Error> {
        let upper = now + Duration::hours(24);
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, deadline, completed, created_at
             FROM goals
             WHERE completed = 0
               AND deadline IS NOT NULL
               AND deadline > ?1
               AND deadline <= ?2
             ORDER BY deadline ASC",
        )?;
        let rows = stmt.query_map(params![now.to_rfc3339(), upper.to_rfc3339()], row_to_goal)?;
        rows.collect()
    }
}

impl GoalStore for GoalDb {
    fn find_due_soon(&self, now: DateTime<Utc>) -> Result<Vec<Goal>, StoreError> {
        self.due_soon(now).map_err(|e| StoreError::Read(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_goal(db: &GoalDb, title: &str, deadline: Option<DateTime<Utc>>) -> Goal {
        let goal = Goal::new("user-1", title, deadline).unwrap();
        db.create_goal(&goal).unwrap();
        goal
    }

    #[test]
    fn create_and_list_roundtrip() {
        let db = GoalDb::open_memory().unwrap();
        let now = Utc::now();
        let goal = insert_goal(&db, "Write thesis", Some(now + Duration::hours(5)));

        let listed = db.list_goals("user-1").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, goal.id);
        assert_eq!(listed[0].title, "Write thesis");
        assert_eq!(listed[0].deadline, goal.deadline);
        assert!(db.list_goals("someone-else").unwrap().is_empty());
    }

    #[test]
    fn due_soon_range_endpoints() {
        let db = GoalDb::open_memory().unwrap();
        let now = Utc::now();

        let within = insert_goal(&db, "within", Some(now + Duration::minutes(30)));
        // Exactly 24h out is inside the query range; the classifier is what
        // keeps it tierless.
        let at_upper = insert_goal(&db, "at-upper", Some(now + Duration::hours(24)));
        insert_goal(&db, "beyond", Some(now + Duration::hours(25)));
        insert_goal(&db, "overdue", Some(now - Duration::hours(1)));
        insert_goal(&db, "at-now", Some(now));
        insert_goal(&db, "no-deadline", None);

        let due: Vec<_> = db
            .find_due_soon(now)
            .unwrap()
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(due, vec![within.id, at_upper.id]);
    }

    #[test]
    fn due_soon_excludes_completed() {
        let db = GoalDb::open_memory().unwrap();
        let now = Utc::now();
        let goal = insert_goal(&db, "done already", Some(now + Duration::minutes(10)));
        assert!(db.set_completed(&goal.id, true).unwrap());
        assert!(db.find_due_soon(now).unwrap().is_empty());
    }

    #[test]
    fn set_completed_and_delete_report_missing_rows() {
        let db = GoalDb::open_memory().unwrap();
        assert!(!db.set_completed("nope", true).unwrap());
        assert!(!db.delete_goal("nope").unwrap());

        let goal = insert_goal(&db, "short-lived", None);
        assert!(db.delete_goal(&goal.id).unwrap());
        assert!(db.list_goals("user-1").unwrap().is_empty());
    }
}
