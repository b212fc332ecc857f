use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

mod advisory;
mod aggregate;
mod config;
mod facade;
mod insight;
mod models;
mod store;
mod window;

use config::AppConfig;
use models::{EventKind, PainEvent, ValidationError, NO_PAIN_LABEL};
use store::{CsvEventStore, EventStore};

#[derive(Parser)]
#[command(name = "edgecare-pain-tracker")]
#[command(about = "Pain event logger with weekly training-load analytics", long_about = None)]
struct Cli {
    /// Path to the append-only event log
    #[arg(long, default_value = "pain_events.csv")]
    data_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the event log with headers if it does not exist
    Init,
    /// Log a pain event for a player
    Log {
        #[arg(long)]
        body_part: String,
        #[arg(long, default_value_t = 5)]
        severity: i64,
        #[arg(long)]
        player: Option<String>,
        /// Event timestamp (RFC 3339); defaults to the current UTC instant
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Log a deliberate "no pain today" entry
    NoPain {
        #[arg(long)]
        player: Option<String>,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Show the last five logged events
    Recent,
    /// List known player ids
    Players,
    /// Player weekly overview
    Overview {
        #[arg(long)]
        player: Option<String>,
        /// Reference instant for the 7-day window (RFC 3339); defaults to now
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// Player weekly chart payload
    Chart {
        #[arg(long)]
        player: Option<String>,
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// Coach report for one player: stats, summary and load guidance
    CoachReport {
        #[arg(long)]
        player: String,
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn raw_record(event: &PainEvent) -> serde_json::Value {
    let (body_part, severity) = match &event.kind {
        EventKind::Pain {
            body_part,
            severity,
        } => (body_part.as_str(), *severity),
        EventKind::NoPain => (NO_PAIN_LABEL, 0),
    };
    json!({
        "timestamp": event.timestamp.to_rfc3339(),
        "player_id": event.player_id,
        "body_part": body_part,
        "severity": severity,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::new(cli.data_file);
    let store = CsvEventStore::new(config.data_file.clone());

    match cli.command {
        Commands::Init => {
            store.init()?;
            println!("Event log ready at {}.", store.path().display());
        }
        Commands::Log {
            body_part,
            severity,
            player,
            at,
        } => {
            if !config.is_allowed_body_part(&body_part) {
                return Err(ValidationError::UnknownBodyPart(body_part).into());
            }
            let player = player.unwrap_or_else(|| config.default_player_id.clone());
            let event = PainEvent::pain(player, body_part, severity, at.unwrap_or_else(Utc::now));
            store.append_event(&event)?;
            if let Some((body_part, severity)) = event.as_pain() {
                println!("Pain logged: {body_part} (severity {severity})");
            }
            print_json(&raw_record(&event))?;
        }
        Commands::NoPain { player, at } => {
            let player = player.unwrap_or_else(|| config.default_player_id.clone());
            let event = PainEvent::no_pain(player, at.unwrap_or_else(Utc::now));
            store.append_event(&event)?;
            println!("No pain recorded for today.");
            print_json(&raw_record(&event))?;
        }
        Commands::Recent => {
            let events = store.list_events()?;
            let recent: Vec<serde_json::Value> = events
                .iter()
                .rev()
                .take(5)
                .rev()
                .map(raw_record)
                .collect();
            print_json(&recent)?;
        }
        Commands::Players => {
            print_json(&store.player_ids()?)?;
        }
        Commands::Overview { player, now } => {
            let player = player.unwrap_or_else(|| config.default_player_id.clone());
            let now = now.unwrap_or_else(Utc::now);
            match facade::weekly_overview(&store, &player, now) {
                Some(overview) => print_json(&overview)?,
                None => print_json(&json!({ "has_data": false }))?,
            }
        }
        Commands::Chart { player, now } => {
            let player = player.unwrap_or_else(|| config.default_player_id.clone());
            let now = now.unwrap_or_else(Utc::now);
            match facade::weekly_chart_data(&store, &player, now) {
                Some(chart) => print_json(&chart)?,
                None => print_json(&json!({ "has_data": false }))?,
            }
        }
        Commands::CoachReport { player, now } => {
            let now = now.unwrap_or_else(Utc::now);
            match facade::coach_report(&store, &player, now) {
                Some(report) => print_json(&report)?,
                None => print_json(&json!({ "has_data": false, "player_id": player }))?,
            }
        }
    }

    Ok(())
}
