//! Deadline reminder engine.
//!
//! The engine is a recurring background process that scans outstanding
//! goals, classifies their remaining time into urgency tiers, and emits at
//! most one notification per (goal, tier) within that tier's window.
//!
//! Pipeline, leaf-first:
//!
//! - [`tier::classify`]: pure mapping from remaining time to a tier
//! - [`dedup::is_owed`]: per-tier suppression against notification history
//! - [`ReminderGenerator`]: one scan -- query, classify, dedup, persist
//! - [`ReminderScheduler`]: wall-clock loop with an `Idle`/`Running` gate
//!
//! The engine holds no state between ticks; every idempotency decision is
//! recomputed from store contents. It consumes the two store traits below
//! and performs no other I/O.

pub mod dedup;
pub mod generator;
pub mod scheduler;
pub mod tier;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::goal::Goal;
use crate::notification::{Notification, NotificationKind};

pub use generator::{ReminderGenerator, ScanSummary};
pub use scheduler::{ReminderScheduler, SchedulerState, TickOutcome};
pub use tier::{classify, ReminderTier};

/// Store failures as seen by the engine.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A query failed. If it was the initial goal query, the scan as a
    /// whole is abandoned and retried fresh on the next tick.
    #[error("store read failed: {0}")]
    Read(String),

    /// A notification failed to persist. Isolated to the affected goal;
    /// the scan continues.
    #[error("store write failed: {0}")]
    Write(String),
}

/// Read access to goals, as the engine needs it.
pub trait GoalStore {
    /// Non-completed goals with a deadline in `(now, now + 24h]`.
    ///
    /// Goals already overdue at `now` are excluded: once a deadline passes,
    /// no further reminder is generated for it.
    fn find_due_soon(&self, now: DateTime<Utc>) -> Result<Vec<Goal>, StoreError>;
}

/// Notification persistence, as the engine needs it.
pub trait NotificationStore {
    /// Notifications for one (user, goal, kind) created at or after `since`.
    fn find_recent(
        &self,
        user_id: &str,
        goal_id: &str,
        kind: NotificationKind,
        since: DateTime<Utc>,
    ) -> Result<Vec<Notification>, StoreError>;

    /// Persist a new notification record.
    fn create(&self, notification: &Notification) -> Result<(), StoreError>;
}
