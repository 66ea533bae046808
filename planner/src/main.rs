mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use planner::{
    load_events, write_backup, Action, ClientConfig, EventDraft, EventsApi, HttpEventsApi,
    PlannerState, SaveScheduler,
};
use shared::calendar::MONTHS_IN_YEAR;
use shared::TimeOfDay;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Plan events on the Gothic world calendar: 12 months of 28 days")]
struct Cli {
    /// Base URL of the events API (overrides PLANNER_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Month of the in-game "today" (1-12)
    #[arg(long, default_value_t = 1)]
    today_month: i64,

    /// Day of the in-game "today" (1-28, clamped)
    #[arg(long, default_value_t = 1)]
    today_day: i64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events from today on, pending first
    Upcoming,
    /// Show the month grid around today
    Month {
        /// Months to move from today's month (negative goes back)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i32,
    },
    /// Show the hour-by-hour plan of one day
    Day { month: u8, day: u8 },
    /// Add a new event
    Add {
        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(long, default_value_t = 1)]
        month: u8,

        #[arg(long, default_value_t = 1)]
        day: u8,

        /// Start time (HH:mm)
        #[arg(long, default_value = "12:00")]
        start: String,

        /// End time (HH:mm)
        #[arg(long, default_value = "13:00")]
        end: String,
    },
    /// Delete an event by id
    Delete { id: i64 },
    /// Mark an event done, or pending again
    Toggle { id: i64 },
    /// Write the current events to gothic_calendar_backup.json
    Backup {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

impl Commands {
    /// Commands whose output replaces stored data with the loaded events.
    fn needs_loaded_events(&self) -> bool {
        matches!(
            self,
            Commands::Add { .. }
                | Commands::Delete { .. }
                | Commands::Toggle { .. }
                | Commands::Backup { .. }
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    let api: Arc<dyn EventsApi> = Arc::new(HttpEventsApi::new(config.api_url.clone()));
    let mut state = PlannerState::new();

    if let Err(e) = load_events(api.as_ref(), &mut state).await {
        error!("Failed to load events from {}: {}", config.api_url, e);
        // Saving or exporting now would replace the stored events with a partial list.
        if cli.command.needs_loaded_events() {
            bail!("refusing to write events that could not be loaded");
        }
    }
    state.dispatch(Action::SetToday {
        month: cli.today_month,
        day: cli.today_day,
    })?;

    let scheduler = SaveScheduler::new(api, config.save_delay);

    let changed = match cli.command {
        Commands::Upcoming => {
            render::upcoming(&state);
            false
        }
        Commands::Month { offset } => {
            state.shift_view(offset);
            render::month(&state);
            false
        }
        Commands::Day { month, day } => {
            if !(1..=MONTHS_IN_YEAR).contains(&month) {
                bail!("month must be between 1 and {}", MONTHS_IN_YEAR);
            }
            let delta = i32::from(month) - i32::from(state.viewing_date().month());
            state.shift_view(delta);
            state.dispatch(Action::SelectDay(day))?;
            render::day(&state);
            false
        }
        Commands::Add {
            title,
            description,
            month,
            day,
            start,
            end,
        } => {
            let draft = EventDraft {
                title,
                description,
                month,
                day,
                start_time: start.parse::<TimeOfDay>()?,
                end_time: end.parse::<TimeOfDay>()?,
            };
            let changed = state.dispatch(Action::AddEvent {
                draft,
                now: chrono::Utc::now(),
            })?;
            if let Some(event) = state.events().last() {
                info!("Added event {}", event.id);
                render::event(event);
            }
            changed
        }
        Commands::Delete { id } => {
            let changed = state.dispatch(Action::DeleteEvent(id))?;
            if !changed {
                println!("No event with id {}", id);
            }
            changed
        }
        Commands::Toggle { id } => {
            let changed = state.dispatch(Action::ToggleStatus(id))?;
            match state.events().iter().find(|e| e.id == id) {
                Some(event) => render::event(event),
                None => println!("No event with id {}", id),
            }
            changed
        }
        Commands::Backup { dir } => {
            let path = write_backup(&dir, &state.document()).await?;
            println!("Backup written to {}", path.display());
            false
        }
    };

    if changed {
        scheduler.schedule(state.document());
    }
    scheduler.close().await;

    Ok(())
}
