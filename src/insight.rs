use crate::models::WeeklyStats;

/// Builds the descriptive (non-advisory) weekly summary: up to three
/// observation sentences in fixed order, joined with single spaces. Never
/// empty — a generic line stands in when no pattern fires.
pub fn compose_summary(stats: &WeeklyStats) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some((top_area, top_count)) = stats.top_area() {
        if top_count >= 3 {
            lines.push(format!(
                "Consistent entries noted for {top_area} over the past week."
            ));
        } else if top_count >= 2 {
            lines.push(format!("Multiple entries recorded for {top_area} this week."));
        }
    }

    let distinct_areas = stats.frequency_by_area.len();
    if distinct_areas >= 4 {
        lines.push("Entries observed across multiple body areas this week.".to_string());
    } else if distinct_areas >= 2 {
        lines.push(format!(
            "Observations recorded across {distinct_areas} body areas."
        ));
    }

    let daily: Vec<f64> = stats
        .daily_average
        .iter()
        .filter_map(|slot| slot.average)
        .collect();
    if daily.len() >= 3 {
        let max = daily.iter().copied().fold(f64::MIN, f64::max);
        let min = daily.iter().copied().fold(f64::MAX, f64::min);
        if max - min <= 2.0 {
            lines.push(
                "Severity levels remained relatively consistent throughout the week.".to_string(),
            );
        }
    }

    if lines.is_empty() {
        lines.push("Observations recorded across the selected period.".to_string());
    }

    lines.join(" ")
}
