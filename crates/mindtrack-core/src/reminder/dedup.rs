//! Per-tier reminder de-duplication.
//!
//! A (goal, tier) reminder is suppressed when a notification for the same
//! goal and the same tier was created within the tier's own window
//! preceding now. Each tier uses its own lookback -- a single shared
//! lookback cannot suppress the 1-hour tier and the 24-hour tier correctly
//! at the same time.
//!
//! Invariant: for every goal g and tier t, at most one notification for
//! (g, t) exists within any span equal to t's window length.

use chrono::{DateTime, Utc};

use crate::notification::{Notification, NotificationKind};

use super::tier::ReminderTier;

/// Decide whether a reminder at `tier` is still owed, given the goal's
/// prior notifications.
///
/// `prior` is expected to already be scoped to a single goal; the guard
/// re-checks kind, tier, and creation time so a coarser query stays safe.
pub fn is_owed(tier: ReminderTier, prior: &[Notification], now: DateTime<Utc>) -> bool {
    let since = now - tier.window();
    !prior.iter().any(|n| {
        n.kind == NotificationKind::GoalReminder && n.tier == Some(tier) && n.created_at >= since
    })
}
