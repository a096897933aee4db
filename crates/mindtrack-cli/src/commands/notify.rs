//! Notification inbox commands for CLI.

use clap::Subcommand;
use mindtrack_core::storage::NotificationDb;
use mindtrack_core::Config;

#[derive(Subcommand)]
pub enum NotifyAction {
    /// List notifications, most recent first
    List {
        /// Owning user
        #[arg(long)]
        user: Option<String>,
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },
    /// Mark a notification as read
    Read {
        /// Notification ID
        id: String,
    },
    /// Mark all notifications as read
    ReadAll {
        /// Owning user
        #[arg(long)]
        user: Option<String>,
    },
    /// Delete a notification
    Delete {
        /// Notification ID
        id: String,
    },
}

pub fn run(action: NotifyAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = NotificationDb::open()?;

    match action {
        NotifyAction::List { user, unread } => {
            let user = user.unwrap_or_else(|| config.default_user.clone());
            let notifications = if unread {
                db.unread_for_user(&user)?
            } else {
                db.list_for_user(&user)?
            };
            println!("{}", serde_json::to_string_pretty(&notifications)?);
        }
        NotifyAction::Read { id } => {
            if db.mark_read(&id)? {
                println!("Notification marked as read: {id}");
            } else {
                return Err(format!("notification not found: {id}").into());
            }
        }
        NotifyAction::ReadAll { user } => {
            let user = user.unwrap_or_else(|| config.default_user.clone());
            let changed = db.mark_all_read(&user)?;
            println!("Marked {changed} notification(s) as read");
        }
        NotifyAction::Delete { id } => {
            if db.delete(&id)? {
                println!("Notification deleted: {id}");
            } else {
                return Err(format!("notification not found: {id}").into());
            }
        }
    }

    Ok(())
}
