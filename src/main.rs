// Countdown command line
// Drives the shared store the same way the app and its widgets do

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use countdown_core::config::AppConfig;
use countdown_core::models::settings::{DisplayComponent, LegacyPreferences};
use countdown_core::services::calendar_selection::{selection_label, CalendarSelectionStore};
use countdown_core::services::countdown::CountdownService;
use countdown_core::services::database::{lock, SharedContainer, SharedDatabase};
use countdown_core::services::favorite::{last_reload, FavoriteStore, MarkerFileReloader};
use countdown_core::services::settings::PreferencesService;
use countdown_core::utils::date::short_date;

#[derive(Parser)]
#[command(name = "countdown")]
#[command(about = "Countdowns and favorite events shared with the widgets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Time left until a date (RFC 3339, e.g. "2025-12-24T18:00:00Z")
    Gap {
        target: String,

        /// Unit for the coarse label
        #[arg(short, long, value_enum, default_value_t = Unit::Day)]
        unit: Unit,
    },
    /// Manage favorite events
    Fav {
        #[command(subcommand)]
        command: FavCommands,
    },
    /// Manage the calendars events are listed from
    Calendars {
        #[command(subcommand)]
        command: CalendarCommands,
    },
    /// Inspect or reset preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },
}

#[derive(Subcommand)]
enum FavCommands {
    Add { event_id: String, occurrence: String },
    Remove { event_id: String },
    Toggle { event_id: String, occurrence: String },
    Check { event_id: String },
    List,
    /// Drop favorites whose event is not in the given list
    Prune { live_ids: Vec<String> },
}

#[derive(Subcommand)]
enum CalendarCommands {
    Enable { calendar_id: String },
    Disable { calendar_id: String },
    List,
    /// Replace the whole selection
    Set { calendar_ids: Vec<String> },
}

#[derive(Subcommand)]
enum PrefsCommands {
    Show,
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum Unit {
    Day,
    Week,
    Month,
}

impl From<Unit> for DisplayComponent {
    fn from(unit: Unit) -> Self {
        match unit {
            Unit::Day => DisplayComponent::Day,
            Unit::Week => DisplayComponent::Week,
            Unit::Month => DisplayComponent::Month,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command {
        Commands::Gap { target, unit } => run_gap(&target, unit.into()),
        Commands::Fav { command } => run_fav(&config, command),
        Commands::Calendars { command } => run_calendars(&config, command),
        Commands::Prefs { command } => run_prefs(&config, command),
    }
}

fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid date '{}', expected RFC 3339", value))?;
    Ok(parsed.with_timezone(&Utc))
}

fn open_container(config: &AppConfig) -> Result<(SharedContainer, SharedDatabase)> {
    let container = SharedContainer::from_config(config)?;
    let db = container.open_database(config.busy_timeout())?;
    Ok((container, db))
}

fn run_gap(target: &str, component: DisplayComponent) -> Result<()> {
    let target = parse_date(target)?;
    let countdown = CountdownService::default();

    println!("{}", countdown.time_gap_until(target));
    println!("{}", countdown.difference_label(target, component));
    Ok(())
}

fn run_fav(config: &AppConfig, command: FavCommands) -> Result<()> {
    let (container, db) = open_container(config)?;
    let reloader = Arc::new(MarkerFileReloader::new(container.timelines_dir()));
    let store = FavoriteStore::new(db, reloader, config.widget_kind.clone());

    match command {
        FavCommands::Add {
            event_id,
            occurrence,
        } => {
            store.add_favorite(&event_id, parse_date(&occurrence)?)?;
            println!("Added {}", event_id);
        }
        FavCommands::Remove { event_id } => {
            store.remove_favorite(&event_id)?;
            println!("Removed {}", event_id);
        }
        FavCommands::Toggle {
            event_id,
            occurrence,
        } => {
            let now_favorite = store.toggle_favorite(&event_id, parse_date(&occurrence)?)?;
            println!("{} {}", event_id, if now_favorite { "added" } else { "removed" });
        }
        FavCommands::Check { event_id } => {
            println!("{}", store.is_favorite(&event_id)?);
        }
        FavCommands::List => {
            let countdown = CountdownService::default();
            for record in store.all_favorites()? {
                println!(
                    "{}\t{}\t{}",
                    record.event_id,
                    short_date(&record.occurrence_date),
                    countdown.time_gap_until(record.occurrence_date)
                );
            }
            if let Some(at) = last_reload(&container.timelines_dir(), &config.widget_kind) {
                log::debug!("Widgets last signalled at {}", at);
            }
        }
        FavCommands::Prune { live_ids } => {
            let live: HashSet<String> = live_ids.into_iter().collect();
            let removed = store.prune_missing(&live)?;
            println!("Pruned {} favorite(s)", removed);
        }
    }

    Ok(())
}

fn run_calendars(config: &AppConfig, command: CalendarCommands) -> Result<()> {
    let (_, db) = open_container(config)?;
    let store = CalendarSelectionStore::new(db);

    match command {
        CalendarCommands::Enable { calendar_id } => store.enable(&calendar_id)?,
        CalendarCommands::Disable { calendar_id } => store.disable(&calendar_id)?,
        CalendarCommands::Set { calendar_ids } => store.replace_all(&calendar_ids)?,
        CalendarCommands::List => {
            let enabled = store.all()?;
            println!("{}", selection_label(enabled.len(), enabled.first().map(String::as_str)));
            for id in &enabled {
                println!("  {}", id);
            }
        }
    }

    Ok(())
}

fn run_prefs(config: &AppConfig, command: PrefsCommands) -> Result<()> {
    let (_, db) = open_container(config)?;
    let db = lock(&db);
    let service = PreferencesService::new(&db);
    let now = Utc::now();

    match command {
        PrefsCommands::Show => {
            if let Some(path) = config.legacy_preferences_path() {
                match LegacyPreferences::load(&path) {
                    Ok(legacy) => {
                        service.migrate_from_legacy(&legacy, now)?;
                    }
                    Err(err) => log::warn!("Skipping legacy preferences: {:#}", err),
                }
            }

            let prefs = service.handle_premium_features(now)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&prefs).context("Failed to encode preferences")?
            );
        }
        PrefsCommands::Reset => {
            service.reset(now)?;
            println!("Preferences reset");
        }
    }

    Ok(())
}
