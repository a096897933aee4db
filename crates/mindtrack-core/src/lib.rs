//! # Mindtrack Core Library
//!
//! This library provides the core business logic for Mindtrack, a goal
//! tracker with deadline reminders. It implements a CLI-first philosophy
//! where all operations are available via a standalone CLI binary.
//!
//! ## Architecture
//!
//! - **Reminder Engine**: A stateless background scan that classifies
//!   outstanding goals into urgency tiers and emits at most one
//!   notification per (goal, tier) within that tier's window, driven by
//!   an `Idle`/`Running` scheduler loop
//! - **Storage**: SQLite-based goal and notification storage and
//!   TOML-based configuration
//!
//! ## Key Components
//!
//! - [`ReminderGenerator`]: One scan -- query, classify, dedup, persist
//! - [`ReminderScheduler`]: Wall-clock scheduler state machine
//! - [`GoalDb`] / [`NotificationDb`]: Persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod goal;
pub mod notification;
pub mod reminder;
pub mod storage;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use goal::Goal;
pub use notification::{Notification, NotificationKind};
pub use reminder::{
    classify, GoalStore, NotificationStore, ReminderGenerator, ReminderScheduler, ReminderTier,
    ScanSummary, SchedulerState, StoreError, TickOutcome,
};
pub use storage::{Config, GoalDb, NotificationDb, ReminderConfig};
