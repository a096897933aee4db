//! Reminder tiers and deadline classification.
//!
//! A tier is an urgency bucket for time-to-deadline. Each tier owns its
//! window, which doubles as its de-duplication lookback: a (goal, tier)
//! reminder fires at most once per window length.
//!
//! Exactly one tier, or none, applies to a goal at a given instant. The
//! imminent window is checked first, so a goal inside both windows gets
//! only the most urgent tier.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::goal::Goal;

/// Urgency bucket for a goal's remaining time, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderTier {
    /// Remaining time in (0h, 1h].
    DueImminent,
    /// Remaining time in (1h, 24h).
    DueSoon,
}

impl ReminderTier {
    /// Tier window. Also the dedup lookback for this tier.
    pub fn window(self) -> Duration {
        match self {
            ReminderTier::DueImminent => Duration::hours(1),
            ReminderTier::DueSoon => Duration::hours(24),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReminderTier::DueImminent => "due_imminent",
            ReminderTier::DueSoon => "due_soon",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "due_imminent" => Some(ReminderTier::DueImminent),
            "due_soon" => Some(ReminderTier::DueSoon),
            _ => None,
        }
    }

    /// Reminder message for a goal with the given title.
    pub fn message(self, title: &str) -> String {
        match self {
            ReminderTier::DueImminent => {
                format!("Your goal \"{title}\" is due in less than 1 hour!")
            }
            ReminderTier::DueSoon => {
                format!("Reminder: Your goal \"{title}\" is due in less than 24 hours.")
            }
        }
    }
}

impl std::fmt::Display for ReminderTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a goal's remaining time into its most urgent matching tier.
///
/// Returns `None` for completed goals, goals without a deadline, goals
/// whose deadline has already passed (overdue goals get no further
/// reminders), and goals 24 hours or more out.
pub fn classify(goal: &Goal, now: DateTime<Utc>) -> Option<ReminderTier> {
    if goal.completed {
        return None;
    }
    let remaining = goal.time_remaining(now)?;
    if remaining <= Duration::zero() {
        None
    } else if remaining <= Duration::hours(1) {
        Some(ReminderTier::DueImminent)
    } else if remaining < Duration::hours(24) {
        Some(ReminderTier::DueSoon)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn goal_due_in(remaining: Duration, now: DateTime<Utc>) -> Goal {
        Goal {
            id: "g-1".to_string(),
            user_id: "user-1".to_string(),
            title: "Test goal".to_string(),
            deadline: Some(now + remaining),
            completed: false,
            created_at: now - Duration::days(3),
        }
    }

    #[test]
    fn forty_five_minutes_is_imminent_only() {
        let now = Utc::now();
        let goal = goal_due_in(Duration::minutes(45), now);
        assert_eq!(classify(&goal, now), Some(ReminderTier::DueImminent));
    }

    #[test]
    fn one_hour_boundary_is_imminent() {
        let now = Utc::now();
        let goal = goal_due_in(Duration::hours(1), now);
        assert_eq!(classify(&goal, now), Some(ReminderTier::DueImminent));
        let goal = goal_due_in(Duration::hours(1) + Duration::seconds(1), now);
        assert_eq!(classify(&goal, now), Some(ReminderTier::DueSoon));
    }

    #[test]
    fn twenty_four_hour_boundary_yields_no_tier() {
        let now = Utc::now();
        let goal = goal_due_in(Duration::hours(24), now);
        assert_eq!(classify(&goal, now), None);
        let goal = goal_due_in(Duration::hours(24) - Duration::seconds(1), now);
        assert_eq!(classify(&goal, now), Some(ReminderTier::DueSoon));
    }

    #[test]
    fn overdue_goal_yields_no_tier() {
        let now = Utc::now();
        let goal = goal_due_in(Duration::zero(), now);
        assert_eq!(classify(&goal, now), None);
        let goal = goal_due_in(-Duration::minutes(5), now);
        assert_eq!(classify(&goal, now), None);
    }

    #[test]
    fn completed_goal_yields_no_tier() {
        let now = Utc::now();
        let mut goal = goal_due_in(Duration::minutes(10), now);
        goal.completed = true;
        assert_eq!(classify(&goal, now), None);
    }

    #[test]
    fn goal_without_deadline_yields_no_tier() {
        let now = Utc::now();
        let mut goal = goal_due_in(Duration::minutes(10), now);
        goal.deadline = None;
        assert_eq!(classify(&goal, now), None);
    }

    #[test]
    fn tier_string_roundtrip() {
        for tier in [ReminderTier::DueImminent, ReminderTier::DueSoon] {
            assert_eq!(ReminderTier::parse(tier.as_str()), Some(tier));
        }
        assert_eq!(ReminderTier::parse("overdue"), None);
    }

    proptest! {
        #[test]
        fn classification_matches_window_arithmetic(secs in -200_000i64..200_000i64) {
            let now = Utc::now();
            let goal = goal_due_in(Duration::seconds(secs), now);
            let expected = if secs <= 0 {
                None
            } else if secs <= 3_600 {
                Some(ReminderTier::DueImminent)
            } else if secs < 86_400 {
                Some(ReminderTier::DueSoon)
            } else {
                None
            };
            prop_assert_eq!(classify(&goal, now), expected);
        }
    }
}
