use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{parse_timestamp, EventKind, PainEvent, NO_PAIN_LABEL};

/// Append-only event log. Append order is not guaranteed to be chronological;
/// readers sort by timestamp themselves.
pub trait EventStore {
    fn list_events(&self) -> anyhow::Result<Vec<PainEvent>>;
    fn append_event(&self, event: &PainEvent) -> anyhow::Result<()>;
}

/// On-disk row shape: `timestamp,player_id,body_part,severity`. The "No Pain"
/// sentinel pair (`body_part = "No Pain"`, `severity = 0`) exists only here.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    timestamp: String,
    player_id: String,
    body_part: String,
    severity: String,
}

impl CsvRow {
    fn encode(event: &PainEvent) -> Self {
        let (body_part, severity) = match &event.kind {
            EventKind::Pain {
                body_part,
                severity,
            } => (body_part.clone(), *severity),
            EventKind::NoPain => (NO_PAIN_LABEL.to_string(), 0),
        };
        Self {
            timestamp: event
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Micros, true),
            player_id: event.player_id.clone(),
            body_part,
            severity: severity.to_string(),
        }
    }

    /// `None` for rows that fail the data-quality filter (unparseable
    /// timestamp or severity). Such rows are skipped, never fatal.
    fn decode(self) -> Option<PainEvent> {
        let timestamp = parse_timestamp(self.timestamp.trim())?;
        if self.body_part == NO_PAIN_LABEL {
            return Some(PainEvent::no_pain(self.player_id, timestamp));
        }
        let severity: i64 = self.severity.trim().parse().ok()?;
        Some(PainEvent::pain(
            self.player_id,
            self.body_part,
            severity,
            timestamp,
        ))
    }
}

pub struct CsvEventStore {
    path: PathBuf,
}

impl CsvEventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the CSV with headers if it does not exist. Never overwrites
    /// existing data.
    pub fn init(&self) -> anyhow::Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("failed to create {}", self.path.display()))?;
        writer.write_record(["timestamp", "player_id", "body_part", "severity"])?;
        writer.flush()?;
        Ok(())
    }

    /// Unique player ids in first-seen order.
    pub fn player_ids(&self) -> anyhow::Result<Vec<String>> {
        let mut players: Vec<String> = Vec::new();
        for event in self.list_events()? {
            if !players.contains(&event.player_id) {
                players.push(event.player_id);
            }
        }
        Ok(players)
    }
}

impl EventStore for CsvEventStore {
    fn list_events(&self) -> anyhow::Result<Vec<PainEvent>> {
        // Missing file is an empty store, not an error.
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;

        let mut events = Vec::new();
        let mut skipped = 0usize;
        for result in reader.deserialize::<CsvRow>() {
            let row = match result {
                Ok(row) => row,
                Err(err) => {
                    warn!(%err, "skipping unreadable event row");
                    skipped += 1;
                    continue;
                }
            };
            match row.decode() {
                Some(event) => events.push(event),
                None => {
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            warn!(skipped, path = %self.path.display(), "dropped malformed event rows");
        }
        Ok(events)
    }

    fn append_event(&self, event: &PainEvent) -> anyhow::Result<()> {
        self.init()?;
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {} for append", self.path.display()))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(CsvRow::encode(event))?;
        writer.flush()?;
        Ok(())
    }
}
