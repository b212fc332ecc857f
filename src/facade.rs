use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::advisory;
use crate::aggregate::aggregate;
use crate::insight::compose_summary;
use crate::models::{DayAverage, PainEvent, WeeklyStats};
use crate::store::EventStore;
use crate::window::WeekWindow;

/// Player-facing weekly overview.
#[derive(Debug, Serialize, PartialEq)]
pub struct WeeklyOverview {
    pub has_data: bool,
    pub average_pain: f64,
    pub pain_days: usize,
    pub most_affected_area: String,
}

/// Player-facing chart payload: seven ordered day slots, `null` (never 0)
/// for days without entries.
#[derive(Debug, Serialize, PartialEq)]
pub struct WeeklyChartData {
    pub has_data: bool,
    pub labels: Vec<String>,
    pub daily_averages: Vec<Option<f64>>,
    pub weekly_avg: f64,
    pub pain_days: usize,
    pub most_affected: String,
    pub body_part_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RecentLog {
    /// "DD Mon" formatted event date.
    pub date: String,
    pub body_part: String,
    pub severity: u8,
}

/// Coach-facing per-player report: full statistics plus the descriptive
/// summary and the load advisory.
#[derive(Debug, Serialize, PartialEq)]
pub struct CoachReport {
    pub has_data: bool,
    pub player_id: String,
    pub total_logs: usize,
    pub average_severity: f64,
    pub pain_days: usize,
    pub most_logged_area: String,
    pub most_active_day: String,
    pub frequency_by_area: BTreeMap<String, usize>,
    pub daily_average: Vec<DayAverage>,
    pub summary_text: String,
    pub recent_logs: Vec<RecentLog>,
    pub load_guidance: String,
}

/// Reads the whole store and keeps the events for one player inside the
/// window, timestamp-sorted. An unreadable store degrades to an empty one
/// rather than failing the query.
fn window_events(
    store: &impl EventStore,
    player_id: &str,
    window: &WeekWindow,
) -> Vec<PainEvent> {
    let all = store.list_events().unwrap_or_else(|err| {
        warn!(%err, "event store unreadable, treating as empty");
        Vec::new()
    });
    let mut events: Vec<PainEvent> = all
        .into_iter()
        .filter(|event| event.player_id == player_id && window.contains(event.timestamp))
        .collect();
    events.sort_by_key(|event| event.timestamp);
    events
}

fn window_stats(
    store: &impl EventStore,
    player_id: &str,
    now: DateTime<Utc>,
) -> Option<(Vec<PainEvent>, WeeklyStats)> {
    let window = WeekWindow::ending_at(now);
    let events = window_events(store, player_id, &window);
    let stats = aggregate(&events, &window)?;
    Some((events, stats))
}

pub fn weekly_overview(
    store: &impl EventStore,
    player_id: &str,
    now: DateTime<Utc>,
) -> Option<WeeklyOverview> {
    let (_, stats) = window_stats(store, player_id, now)?;
    Some(WeeklyOverview {
        has_data: true,
        average_pain: stats.average_severity,
        pain_days: stats.pain_days,
        most_affected_area: stats.most_logged_area,
    })
}

pub fn weekly_chart_data(
    store: &impl EventStore,
    player_id: &str,
    now: DateTime<Utc>,
) -> Option<WeeklyChartData> {
    let (_, stats) = window_stats(store, player_id, now)?;
    Some(WeeklyChartData {
        has_data: true,
        labels: stats
            .daily_average
            .iter()
            .map(|slot| slot.label.clone())
            .collect(),
        daily_averages: stats.daily_average.iter().map(|slot| slot.average).collect(),
        weekly_avg: stats.average_severity,
        pain_days: stats.pain_days,
        most_affected: stats.most_logged_area,
        body_part_counts: stats.frequency_by_area,
    })
}

pub fn coach_report(
    store: &impl EventStore,
    player_id: &str,
    now: DateTime<Utc>,
) -> Option<CoachReport> {
    let (events, stats) = window_stats(store, player_id, now)?;

    // Most recent first, capped at 5. Sentinel rows never appear here.
    let mut recent: Vec<&PainEvent> =
        events.iter().filter(|event| event.as_pain().is_some()).collect();
    recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    let recent_logs = recent
        .iter()
        .take(5)
        .filter_map(|event| {
            event.as_pain().map(|(body_part, severity)| RecentLog {
                date: event.timestamp.format("%d %b").to_string(),
                body_part: body_part.to_string(),
                severity,
            })
        })
        .collect();

    let summary_text = compose_summary(&stats);
    let load_guidance = advisory::advise(
        stats.average_severity,
        stats.pain_days,
        &stats.frequency_by_area,
    )
    .guidance()
    .to_string();

    Some(CoachReport {
        has_data: true,
        player_id: player_id.to_string(),
        total_logs: stats.total_logs,
        average_severity: stats.average_severity,
        pain_days: stats.pain_days,
        most_logged_area: stats.most_logged_area,
        most_active_day: stats.most_active_day,
        frequency_by_area: stats.frequency_by_area,
        daily_average: stats.daily_average,
        summary_text,
        recent_logs,
        load_guidance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    /// In-memory store; the `Err` variant exercises the unreadable-store
    /// liveness path.
    struct MemoryStore {
        events: Vec<PainEvent>,
        fail_reads: bool,
    }

    impl MemoryStore {
        fn with(events: Vec<PainEvent>) -> Self {
            Self {
                events,
                fail_reads: false,
            }
        }
    }

    impl EventStore for MemoryStore {
        fn list_events(&self) -> anyhow::Result<Vec<PainEvent>> {
            if self.fail_reads {
                anyhow::bail!("store offline");
            }
            Ok(self.events.clone())
        }

        fn append_event(&self, _event: &PainEvent) -> anyhow::Result<()> {
            anyhow::bail!("read-only test store");
        }
    }

    fn reference_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 30, 18, 0, 0).unwrap()
    }

    fn pain(player: &str, body_part: &str, severity: i64, days_ago: i64) -> PainEvent {
        PainEvent::pain(
            player,
            body_part,
            severity,
            reference_now() - Duration::days(days_ago) - Duration::hours(3),
        )
    }

    #[test]
    fn empty_window_yields_no_data_for_every_query() {
        let store = MemoryStore::with(vec![pain("player_002", "Chest", 4, 1)]);
        let now = reference_now();
        assert!(weekly_overview(&store, "player_001", now).is_none());
        assert!(weekly_chart_data(&store, "player_001", now).is_none());
        assert!(coach_report(&store, "player_001", now).is_none());
    }

    #[test]
    fn unreadable_store_degrades_to_no_data() {
        let store = MemoryStore {
            events: vec![pain("player_001", "Chest", 4, 1)],
            fail_reads: true,
        };
        assert!(weekly_overview(&store, "player_001", reference_now()).is_none());
    }

    #[test]
    fn sentinel_only_week_yields_no_data() {
        let store = MemoryStore::with(vec![
            PainEvent::no_pain("player_001", reference_now() - Duration::days(1)),
        ]);
        assert!(weekly_overview(&store, "player_001", reference_now()).is_none());
    }

    #[test]
    fn events_outside_the_window_are_ignored() {
        let store = MemoryStore::with(vec![
            pain("player_001", "Left Knee", 9, 10),
            pain("player_001", "Left Knee", 3, 1),
        ]);
        let overview = weekly_overview(&store, "player_001", reference_now()).unwrap();
        assert_eq!(overview.average_pain, 3.0);
        assert_eq!(overview.pain_days, 1);
    }

    #[test]
    fn overview_reports_the_window_aggregates() {
        let store = MemoryStore::with(vec![
            pain("player_001", "Left Knee", 4, 1),
            pain("player_001", "Left Knee", 7, 2),
            pain("player_001", "Chest", 5, 3),
            PainEvent::no_pain("player_001", reference_now() - Duration::days(1)),
        ]);
        let overview = weekly_overview(&store, "player_001", reference_now()).unwrap();
        assert!(overview.has_data);
        assert_eq!(overview.average_pain, 5.3);
        assert_eq!(overview.pain_days, 3);
        assert_eq!(overview.most_affected_area, "Left Knee");
    }

    #[test]
    fn chart_data_has_seven_aligned_slots() {
        let store = MemoryStore::with(vec![pain("player_001", "Left Knee", 6, 0)]);
        let chart = weekly_chart_data(&store, "player_001", reference_now()).unwrap();
        assert_eq!(chart.labels.len(), 7);
        assert_eq!(chart.daily_averages.len(), 7);
        assert_eq!(chart.labels[6], "Sun");
        assert_eq!(chart.daily_averages[6], Some(6.0));
        assert!(chart.daily_averages[..6].iter().all(Option::is_none));
        assert_eq!(chart.body_part_counts["Left Knee"], 1);
    }

    #[test]
    fn coach_report_carries_summary_and_guidance() {
        let store = MemoryStore::with(vec![
            pain("player_001", "Left Knee", 4, 1),
            pain("player_001", "Left Knee", 5, 2),
            pain("player_001", "Left Knee", 6, 3),
        ]);
        let report = coach_report(&store, "player_001", reference_now()).unwrap();
        assert_eq!(report.total_logs, 3);
        assert_eq!(report.average_severity, 5.0);
        assert_eq!(report.most_logged_area, "Left Knee");
        // avg 5.0 hits the reduced-load tier before controlled load.
        assert_eq!(
            report.load_guidance,
            "Recent entries suggest considering a reduced training load."
        );
        assert!(report
            .summary_text
            .starts_with("Consistent entries noted for Left Knee"));
        assert_eq!(report.daily_average.len(), 7);
    }

    #[test]
    fn recent_logs_are_newest_first_and_capped_at_five() {
        let events: Vec<PainEvent> = (0..7)
            .map(|days_ago| pain("player_001", "Left Knee", 4, days_ago as i64))
            .collect();
        let store = MemoryStore::with(events);
        let report = coach_report(&store, "player_001", reference_now()).unwrap();
        assert_eq!(report.recent_logs.len(), 5);
        assert_eq!(report.recent_logs[0].date, "30 Aug");
        assert_eq!(report.recent_logs[4].date, "26 Aug");
        assert_eq!(report.recent_logs[0].body_part, "Left Knee");
    }

    #[test]
    fn repeated_queries_with_fixed_now_are_identical() {
        let store = MemoryStore::with(vec![
            pain("player_001", "Left Knee", 4, 1),
            pain("player_001", "Chest", 7, 4),
        ]);
        let now = reference_now();
        let first = serde_json::to_string(&coach_report(&store, "player_001", now)).unwrap();
        let second = serde_json::to_string(&coach_report(&store, "player_001", now)).unwrap();
        assert_eq!(first, second);
    }
}
