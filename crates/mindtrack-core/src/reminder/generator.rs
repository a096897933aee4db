//! Reminder generation -- one scan over due goals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::goal::Goal;
use crate::notification::{Notification, NotificationKind};

use super::tier::{classify, ReminderTier};
use super::{dedup, GoalStore, NotificationStore, StoreError};

/// Outcome counts of a single scan, for logging and metrics scraping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Goals that matched a reminder tier this tick.
    pub attempted: usize,
    /// Notifications persisted.
    pub created: usize,
    /// Goals whose notification read or write failed.
    pub failed: usize,
}

/// Executes one scan: query due goals, classify, filter through the dedup
/// guard, and persist notification records.
///
/// The generator is stateless; it borrows its stores and recomputes every
/// decision from store contents on each scan.
pub struct ReminderGenerator<'a> {
    goals: &'a dyn GoalStore,
    notifications: &'a dyn NotificationStore,
}

impl<'a> ReminderGenerator<'a> {
    pub fn new(goals: &'a dyn GoalStore, notifications: &'a dyn NotificationStore) -> Self {
        Self {
            goals,
            notifications,
        }
    }

    /// Run one scan at the given instant.
    ///
    /// A failure of the initial goal query aborts the scan. Per-goal
    /// failures are caught, logged, and counted; remaining goals are still
    /// processed.
    ///
    /// # Errors
    /// Returns an error only when the goal query itself fails.
    pub fn scan(&self, now: DateTime<Utc>) -> Result<ScanSummary, StoreError> {
        let due = self.goals.find_due_soon(now)?;
        let mut summary = ScanSummary::default();

        for goal in &due {
            let Some(tier) = classify(goal, now) else {
                continue;
            };
            summary.attempted += 1;
            match self.remind(goal, tier, now) {
                Ok(true) => summary.created += 1,
                Ok(false) => {
                    debug!(goal_id = %goal.id, tier = %tier, "reminder suppressed by dedup window");
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!(goal_id = %goal.id, tier = %tier, error = %e, "failed to persist reminder");
                }
            }
        }

        info!(
            attempted = summary.attempted,
            created = summary.created,
            failed = summary.failed,
            "reminder scan complete"
        );
        Ok(summary)
    }

    /// Emit a reminder for (goal, tier) unless one is already on record
    /// within the tier's window. Returns whether a notification was created.
    fn remind(
        &self,
        goal: &Goal,
        tier: ReminderTier,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let since = now - tier.window();
        let prior = self.notifications.find_recent(
            &goal.user_id,
            &goal.id,
            NotificationKind::GoalReminder,
            since,
        )?;
        if !dedup::is_owed(tier, &prior, now) {
            return Ok(false);
        }
        let notification = Notification::reminder(goal, tier, now);
        self.notifications.create(&notification)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::super::testing::{MemoryGoalStore, MemoryNotificationStore};
    use super::*;

    fn goal_due_in(remaining: Duration, now: DateTime<Utc>, id: &str) -> Goal {
        Goal {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            title: format!("Goal {id}"),
            deadline: Some(now + remaining),
            completed: false,
            created_at: now - Duration::days(1),
        }
    }

    #[test]
    fn first_scan_creates_second_scan_is_idempotent() {
        let now = Utc::now();
        let goals = MemoryGoalStore::new(vec![goal_due_in(Duration::minutes(50), now, "g-1")]);
        let notifications = MemoryNotificationStore::default();
        let generator = ReminderGenerator::new(&goals, &notifications);

        let first = generator.scan(now).unwrap();
        assert_eq!(first.attempted, 1);
        assert_eq!(first.created, 1);
        assert_eq!(first.failed, 0);

        let second = generator.scan(now).unwrap();
        assert_eq!(second.attempted, 1);
        assert_eq!(second.created, 0);
        assert_eq!(second.failed, 0);

        let records = notifications.created();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tier, Some(ReminderTier::DueImminent));
        assert_eq!(records[0].goal_id.as_deref(), Some("g-1"));
    }

    #[test]
    fn rescan_five_minutes_later_creates_nothing() {
        let now = Utc::now();
        let goals = MemoryGoalStore::new(vec![goal_due_in(Duration::minutes(50), now, "g-1")]);
        let notifications = MemoryNotificationStore::default();
        let generator = ReminderGenerator::new(&goals, &notifications);

        generator.scan(now).unwrap();
        let later = generator.scan(now + Duration::minutes(5)).unwrap();
        assert_eq!(later.created, 0);
        assert_eq!(notifications.created().len(), 1);
    }

    #[test]
    fn tier_crossing_fires_each_tier_once() {
        let now = Utc::now();
        let goals = MemoryGoalStore::new(vec![goal_due_in(Duration::hours(10), now, "g-1")]);
        let notifications = MemoryNotificationStore::default();
        let generator = ReminderGenerator::new(&goals, &notifications);

        let soon = generator.scan(now).unwrap();
        assert_eq!(soon.created, 1);

        // 9.5 hours later the goal is 30 minutes out: the imminent tier is
        // a fresh dedup key and fires despite the recent due_soon record.
        let imminent = generator.scan(now + Duration::minutes(570)).unwrap();
        assert_eq!(imminent.created, 1);

        let tiers: Vec<_> = notifications.created().iter().map(|n| n.tier).collect();
        assert_eq!(
            tiers,
            vec![Some(ReminderTier::DueSoon), Some(ReminderTier::DueImminent)]
        );
    }

    #[test]
    fn goal_read_failure_aborts_scan() {
        let now = Utc::now();
        let mut goals = MemoryGoalStore::new(vec![goal_due_in(Duration::minutes(50), now, "g-1")]);
        goals.fail_reads = true;
        let notifications = MemoryNotificationStore::default();
        let generator = ReminderGenerator::new(&goals, &notifications);

        assert!(matches!(generator.scan(now), Err(StoreError::Read(_))));
        assert!(notifications.created().is_empty());
    }

    #[test]
    fn write_failure_is_isolated_per_goal() {
        let now = Utc::now();
        let goals = MemoryGoalStore::new(vec![
            goal_due_in(Duration::minutes(30), now, "g-1"),
            goal_due_in(Duration::hours(5), now, "g-2"),
        ]);
        let notifications = MemoryNotificationStore {
            fail_writes: true,
            ..Default::default()
        };
        let generator = ReminderGenerator::new(&goals, &notifications);

        // Both writes fail, but the scan still reaches every goal and
        // reports instead of erroring out.
        let summary = generator.scan(now).unwrap();
        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.created, 0);
        assert_eq!(summary.failed, 2);
    }

    #[test]
    fn notification_read_failure_counts_as_failed() {
        let now = Utc::now();
        let goals = MemoryGoalStore::new(vec![goal_due_in(Duration::minutes(30), now, "g-1")]);
        let notifications = MemoryNotificationStore {
            fail_reads: true,
            ..Default::default()
        };
        let generator = ReminderGenerator::new(&goals, &notifications);

        let summary = generator.scan(now).unwrap();
        assert_eq!(summary.attempted, 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn goals_outside_any_tier_are_not_attempted() {
        let now = Utc::now();
        // Exactly 24h out: returned by the range query but classified to no
        // tier, so it never reaches the dedup guard.
        let goals = MemoryGoalStore::new(vec![goal_due_in(Duration::hours(24), now, "g-1")]);
        let notifications = MemoryNotificationStore::default();
        let generator = ReminderGenerator::new(&goals, &notifications);

        let summary = generator.scan(now).unwrap();
        assert_eq!(summary.attempted, 0);
        assert!(notifications.created().is_empty());
    }
}
