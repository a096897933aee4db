//! Scheduler loop for the reminder engine.
//!
//! The scheduler is a two-state machine driven by a wall-clock timer:
//!
//! ```text
//! Idle -> Running   on tick
//! Running -> Idle   on scan completion (success or reported failure)
//! ```
//!
//! A tick that fires while a scan is still running is dropped, never
//! queued, so at most one scan executes at a time. The tick interval is
//! configuration; tier windows are engine constants and deliberately not
//! derived from it, so correctness never assumes the interval is shorter
//! than the smallest window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::generator::{ReminderGenerator, ScanSummary};
use super::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    Idle,
    Running,
}

/// What happened on a single tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// Scan ran to completion (possibly with per-goal failures).
    Completed(ScanSummary),
    /// The initial goal query failed; the next tick retries fresh.
    Aborted(StoreError),
    /// A previous scan was still running; this tick was dropped.
    Dropped,
}

/// Owns the timer and serializes scans.
pub struct ReminderScheduler<'a> {
    generator: ReminderGenerator<'a>,
    interval: std::time::Duration,
    state: SchedulerState,
    ticks_dropped: u64,
}

impl<'a> ReminderScheduler<'a> {
    pub fn new(generator: ReminderGenerator<'a>, interval: std::time::Duration) -> Self {
        Self {
            generator,
            interval,
            state: SchedulerState::Idle,
            ticks_dropped: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Ticks dropped because a scan was still in progress.
    pub fn ticks_dropped(&self) -> u64 {
        self.ticks_dropped
    }

    /// Process one tick at the given instant.
    ///
    /// Always returns the machine to `Idle` afterwards; no outcome is fatal
    /// to the loop.
    pub fn on_tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.state == SchedulerState::Running {
            self.ticks_dropped += 1;
            warn!("tick fired while a scan was still running; dropped");
            return TickOutcome::Dropped;
        }

        self.state = SchedulerState::Running;
        let outcome = match self.generator.scan(now) {
            Ok(summary) => TickOutcome::Completed(summary),
            Err(e) => {
                warn!(error = %e, "scan aborted; retrying on next tick");
                TickOutcome::Aborted(e)
            }
        };
        self.state = SchedulerState::Idle;
        outcome
    }

    /// Drive the loop on a fixed wall-clock interval. Does not return.
    ///
    /// Ticks missed while a scan runs long are skipped by the timer itself;
    /// the `Idle`/`Running` gate in [`Self::on_tick`] is the backstop for
    /// any tick delivered anyway.
    pub async fn run(&mut self) {
        info!(interval_secs = self.interval.as_secs(), "reminder scheduler started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            self.on_tick(Utc::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use crate::goal::Goal;

    use super::super::testing::{MemoryGoalStore, MemoryNotificationStore};
    use super::*;

    fn goal_due_in(remaining: Duration, now: DateTime<Utc>) -> Goal {
        Goal {
            id: "g-1".to_string(),
            user_id: "user-1".to_string(),
            title: "Test goal".to_string(),
            deadline: Some(now + remaining),
            completed: false,
            created_at: now - Duration::days(1),
        }
    }

    #[test]
    fn tick_runs_scan_and_returns_to_idle() {
        let now = Utc::now();
        let goals = MemoryGoalStore::new(vec![goal_due_in(Duration::minutes(30), now)]);
        let notifications = MemoryNotificationStore::default();
        let generator = ReminderGenerator::new(&goals, &notifications);
        let mut scheduler =
            ReminderScheduler::new(generator, std::time::Duration::from_secs(3600));

        assert_eq!(scheduler.state(), SchedulerState::Idle);
        match scheduler.on_tick(now) {
            TickOutcome::Completed(summary) => assert_eq!(summary.created, 1),
            other => panic!("expected Completed, got {other:?}"),
        }
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn tick_while_running_is_dropped() {
        let now = Utc::now();
        let goals = MemoryGoalStore::new(vec![]);
        let notifications = MemoryNotificationStore::default();
        let generator = ReminderGenerator::new(&goals, &notifications);
        let mut scheduler =
            ReminderScheduler::new(generator, std::time::Duration::from_secs(3600));

        scheduler.state = SchedulerState::Running;
        assert!(matches!(scheduler.on_tick(now), TickOutcome::Dropped));
        assert_eq!(scheduler.ticks_dropped(), 1);
        // The gate drops the tick without touching the running marker.
        assert_eq!(scheduler.state(), SchedulerState::Running);
    }

    #[test]
    fn aborted_scan_returns_to_idle_and_next_tick_retries() {
        let now = Utc::now();
        let mut goals = MemoryGoalStore::new(vec![goal_due_in(Duration::minutes(30), now)]);
        goals.fail_reads = true;
        let notifications = MemoryNotificationStore::default();
        let generator = ReminderGenerator::new(&goals, &notifications);
        let mut scheduler =
            ReminderScheduler::new(generator, std::time::Duration::from_secs(3600));

        assert!(matches!(scheduler.on_tick(now), TickOutcome::Aborted(_)));
        assert_eq!(scheduler.state(), SchedulerState::Idle);

        // A second tick proceeds normally once the machine is idle again.
        assert!(matches!(scheduler.on_tick(now), TickOutcome::Aborted(_)));
    }
}
