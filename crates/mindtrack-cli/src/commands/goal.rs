//! Goal management commands for CLI.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use mindtrack_core::storage::GoalDb;
use mindtrack_core::{Config, Goal};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a new goal
    Add {
        /// Goal title
        title: String,
        /// Deadline as RFC 3339 (e.g. 2026-09-01T17:00:00Z)
        #[arg(long)]
        deadline: Option<String>,
        /// Owning user (defaults to the configured default_user)
        #[arg(long)]
        user: Option<String>,
    },
    /// List goals
    List {
        /// Owning user
        #[arg(long)]
        user: Option<String>,
        /// Only goals not yet completed
        #[arg(long)]
        open: bool,
    },
    /// Mark a goal as completed
    Complete {
        /// Goal ID
        id: String,
    },
    /// Delete a goal
    Delete {
        /// Goal ID
        id: String,
    },
}

pub fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = GoalDb::open()?;

    match action {
        GoalAction::Add {
            title,
            deadline,
            user,
        } => {
            let deadline = deadline
                .map(|s| {
                    DateTime::parse_from_rfc3339(&s).map(|dt| dt.with_timezone(&Utc))
                })
                .transpose()?;
            let user = user.unwrap_or_else(|| config.default_user.clone());
            let goal = Goal::new(user, &title, deadline)?;
            db.create_goal(&goal)?;
            println!("Goal created: {}", goal.id);
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        GoalAction::List { user, open } => {
            let user = user.unwrap_or_else(|| config.default_user.clone());
            let goals: Vec<Goal> = db
                .list_goals(&user)?
                .into_iter()
                .filter(|g| !open || !g.completed)
                .collect();
            println!("{}", serde_json::to_string_pretty(&goals)?);
        }
        GoalAction::Complete { id } => {
            if db.set_completed(&id, true)? {
                println!("Goal completed: {id}");
            } else {
                return Err(format!("goal not found: {id}").into());
            }
        }
        GoalAction::Delete { id } => {
            if db.delete_goal(&id)? {
                println!("Goal deleted: {id}");
            } else {
                return Err(format!("goal not found: {id}").into());
            }
        }
    }

    Ok(())
}
