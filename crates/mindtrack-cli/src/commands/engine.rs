//! Reminder engine commands for CLI.

use chrono::Utc;
use clap::Subcommand;
use mindtrack_core::storage::{GoalDb, NotificationDb};
use mindtrack_core::{Config, ReminderGenerator, ReminderScheduler};

#[derive(Subcommand)]
pub enum EngineAction {
    /// Run a single reminder scan and print the summary
    Scan,
    /// Run the recurring scheduler loop (blocks until interrupted)
    Run {
        /// Override the configured tick interval
        #[arg(long)]
        interval_secs: Option<u64>,
    },
}

pub fn run(action: EngineAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let goals = GoalDb::open()?;
    let notifications = NotificationDb::open()?;
    let generator = ReminderGenerator::new(&goals, &notifications);

    match action {
        EngineAction::Scan => {
            let summary = generator.scan(Utc::now())?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        EngineAction::Run { interval_secs } => {
            if !config.reminders.enabled {
                println!("reminders are disabled (set reminders.enabled = true to enable)");
                return Ok(());
            }
            let secs = interval_secs.unwrap_or(config.reminders.tick_interval_secs);
            let interval = std::time::Duration::from_secs(secs.max(1));
            let mut scheduler = ReminderScheduler::new(generator, interval);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime.block_on(scheduler.run());
        }
    }

    Ok(())
}
