use std::collections::{BTreeMap, BTreeSet};

use crate::models::{DayAverage, PainEvent, WeeklyStats};
use crate::window::WeekWindow;

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Computes weekly statistics for events already filtered to one player and
/// one window. Sentinel ("no pain") events never count toward any statistic.
/// Returns `None` when nothing remains after excluding sentinels — callers
/// must report no data rather than zeros.
pub fn aggregate(events: &[PainEvent], window: &WeekWindow) -> Option<WeeklyStats> {
    let pain_events: Vec<(&PainEvent, &str, u8)> = events
        .iter()
        .filter_map(|event| {
            event
                .as_pain()
                .map(|(body_part, severity)| (event, body_part, severity))
        })
        .collect();

    if pain_events.is_empty() {
        return None;
    }

    let total_logs = pain_events.len();
    let severity_sum: u64 = pain_events.iter().map(|(_, _, s)| u64::from(*s)).sum();
    let average_severity = round1(severity_sum as f64 / total_logs as f64);

    let pain_days = pain_events
        .iter()
        .map(|(event, _, _)| event.date())
        .collect::<BTreeSet<_>>()
        .len();

    let mut frequency_by_area: BTreeMap<String, usize> = BTreeMap::new();
    for (_, body_part, _) in &pain_events {
        *frequency_by_area.entry((*body_part).to_string()).or_insert(0) += 1;
    }
    // Ties resolve to whichever maximum the iteration yields; the contract
    // is "any area achieving the maximum count".
    let most_logged_area = frequency_by_area
        .iter()
        .max_by_key(|(_, count)| **count)
        .map(|(area, _)| area.clone())?;

    let mut weekday_counts: BTreeMap<String, usize> = BTreeMap::new();
    for (event, _, _) in &pain_events {
        let weekday = event.timestamp.format("%A").to_string();
        *weekday_counts.entry(weekday).or_insert(0) += 1;
    }
    let most_active_day = weekday_counts
        .iter()
        .max_by_key(|(_, count)| **count)
        .map(|(day, _)| day.clone())?;

    let daily_average = window
        .trailing_dates()
        .into_iter()
        .map(|date| {
            let severities: Vec<u64> = pain_events
                .iter()
                .filter(|(event, _, _)| event.date() == date)
                .map(|(_, _, s)| u64::from(*s))
                .collect();
            let average = if severities.is_empty() {
                None
            } else {
                let sum: u64 = severities.iter().sum();
                Some(round1(sum as f64 / severities.len() as f64))
            };
            DayAverage {
                date,
                label: date.format("%a").to_string(),
                average,
            }
        })
        .collect();

    Some(WeeklyStats {
        total_logs,
        average_severity,
        pain_days,
        frequency_by_area,
        most_logged_area,
        most_active_day,
        daily_average,
    })
}
