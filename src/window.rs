//! The reporting window: the last fully completed Monday-to-Monday week.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, Utc};

/// Half-open interval `[start, end)` covering one calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportingWindow {
    /// The week that finished most recently before `now`, in UTC.
    ///
    /// On a Monday the window is the week that ended at midnight that day.
    pub fn preceding(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let since_monday = u64::from(today.weekday().num_days_from_monday());
        let this_monday = today - Days::new(since_monday);

        let end = this_monday.and_time(NaiveTime::MIN).and_utc();
        Self {
            start: end - Duration::days(7),
            end,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    /// Human-readable range such as "June 2nd - June 8th".
    pub fn display_range(&self) -> String {
        format_date_range(self.start, self.end)
    }
}

/// Formats `start` and the day before `end` as "Month Dayth - Month Dayth".
pub fn format_date_range(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let last_day = end - Duration::days(1);
    format!(
        "{} - {}",
        format_month_day(start.date_naive()),
        format_month_day(last_day.date_naive())
    )
}

fn format_month_day(date: NaiveDate) -> String {
    let day = date.day();
    format!("{} {}{}", date.format("%B"), day, ordinal_suffix(day))
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
