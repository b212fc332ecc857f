use chrono::{DateTime, Duration, NaiveDate, Utc};

/// The trailing 7-day analytics window, half-open: `[now - 7 days, now)`.
/// `now` is always supplied by the caller so queries are reproducible.
#[derive(Debug, Clone, Copy)]
pub struct WeekWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl WeekWindow {
    pub fn ending_at(now: DateTime<Utc>) -> Self {
        Self {
            start: now - Duration::days(7),
            end: now,
        }
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp < self.end
    }

    /// The 7 trailing calendar dates, oldest first: six days back through
    /// the reference day itself. Used for day-bucketed reports.
    pub fn trailing_dates(&self) -> Vec<NaiveDate> {
        let today = self.end.date_naive();
        (0..7).rev().map(|back| today - Duration::days(back)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap()
    }

    #[test]
    fn lower_bound_is_inclusive_upper_is_exclusive() {
        let now = reference_now();
        let window = WeekWindow::ending_at(now);
        assert!(window.contains(now - Duration::days(7)));
        assert!(window.contains(now - Duration::seconds(1)));
        assert!(!window.contains(now));
        assert!(!window.contains(now - Duration::days(7) - Duration::seconds(1)));
    }

    #[test]
    fn trailing_dates_cover_seven_days_oldest_first() {
        let window = WeekWindow::ending_at(reference_now());
        let dates = window.trailing_dates();
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2026, 8, 24).unwrap());
        assert_eq!(dates[6], NaiveDate::from_ymd_opt(2026, 8, 30).unwrap());
        for pair in dates.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
    }
}
