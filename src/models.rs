use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Label used on disk for the "no pain today" sentinel row. In memory the
/// sentinel is the `EventKind::NoPain` variant; this string never reaches
/// the analytics code.
pub const NO_PAIN_LABEL: &str = "No Pain";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Pain { body_part: String, severity: u8 },
    NoPain,
}

/// A single logged observation. Immutable once appended; the store never
/// updates or deletes rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PainEvent {
    pub timestamp: DateTime<Utc>,
    pub player_id: String,
    pub kind: EventKind,
}

impl PainEvent {
    /// Severity outside 1..=10 is clamped at the write boundary, not rejected.
    pub fn pain(
        player_id: impl Into<String>,
        body_part: impl Into<String>,
        severity: i64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            player_id: player_id.into(),
            kind: EventKind::Pain {
                body_part: body_part.into(),
                severity: severity.clamp(1, 10) as u8,
            },
        }
    }

    pub fn no_pain(player_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            player_id: player_id.into(),
            kind: EventKind::NoPain,
        }
    }

    /// Body part and severity when this is a pain observation; `None` for
    /// the sentinel. Analytics filters on this.
    pub fn as_pain(&self) -> Option<(&str, u8)> {
        match &self.kind {
            EventKind::Pain {
                body_part,
                severity,
            } => Some((body_part.as_str(), *severity)),
            EventKind::NoPain => None,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Accepts RFC 3339 as well as the naive ISO-8601 strings the original
/// logger wrote (`2026-08-30T09:15:00.123456`, no offset, implicitly UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}

/// Average severity for one calendar day of the trailing week.
/// `average` is `None` when no pain events fall on that date; never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAverage {
    #[serde(skip_serializing)]
    pub date: NaiveDate,
    /// Short weekday label (Mon, Tue, ...).
    pub label: String,
    pub average: Option<f64>,
}

/// Weekly statistics for one player, recomputed from the event log on every
/// query and discarded afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyStats {
    pub total_logs: usize,
    pub average_severity: f64,
    pub pain_days: usize,
    pub frequency_by_area: BTreeMap<String, usize>,
    pub most_logged_area: String,
    /// Full weekday name (Monday, ...) with the most entries.
    pub most_active_day: String,
    /// Exactly 7 entries, oldest first.
    pub daily_average: Vec<DayAverage>,
}

impl WeeklyStats {
    pub fn top_area(&self) -> Option<(&str, usize)> {
        self.frequency_by_area
            .iter()
            .max_by_key(|(_, count)| **count)
            .map(|(area, count)| (area.as_str(), *count))
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("unrecognized body part: {0}")]
    UnknownBodyPart(String),
}
