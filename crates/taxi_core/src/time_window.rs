//! Fixed-width pickup window around the selected moment.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// Half-width of the window on either side of the selected time.
pub const HALF_WINDOW_HOURS: i64 = 2;

/// Timestamp layout understood by the remote query language.
pub const QUERY_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.000";

pub fn half_window() -> Duration {
    Duration::hours(HALF_WINDOW_HOURS)
}

/// Closed pickup interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Window spanning [`HALF_WINDOW_HOURS`] before and after `time`.
    pub fn around(time: NaiveDateTime) -> Self {
        let half = half_window();
        Self {
            start: time
                .checked_sub_signed(half)
                .unwrap_or(NaiveDateTime::MIN),
            end: time
                .checked_add_signed(half)
                .unwrap_or(NaiveDateTime::MAX),
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn start_literal(&self) -> String {
        format_query_timestamp(self.start)
    }

    pub fn end_literal(&self) -> String {
        format_query_timestamp(self.end)
    }
}

/// Format with second precision and a literal `.000` fraction.
pub fn format_query_timestamp(time: NaiveDateTime) -> String {
    time.format(QUERY_TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(month: u32, day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2014, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    #[test]
    fn window_spans_two_hours_each_side() {
        let window = TimeWindow::around(at(1, 15, 9, 0, 0));
        assert_eq!(window.start_literal(), "2014-01-15T07:00:00.000");
        assert_eq!(window.end_literal(), "2014-01-15T11:00:00.000");
        assert!(window.start < window.end);
        assert_eq!(window.duration(), Duration::hours(4));
    }

    #[test]
    fn window_crosses_midnight_and_year_boundary() {
        let window = TimeWindow::around(at(1, 1, 1, 30, 15));
        assert_eq!(window.start_literal(), "2013-12-31T23:30:15.000");
        assert_eq!(window.end_literal(), "2014-01-01T03:30:15.000");
    }

    #[test]
    fn sub_second_precision_is_dropped_from_literals() {
        let time = at(6, 1, 12, 0, 5)
            .checked_add_signed(Duration::milliseconds(750))
            .unwrap();
        let window = TimeWindow::around(time);
        assert_eq!(window.start_literal(), "2014-06-01T10:00:05.000");
    }

    #[test]
    fn every_hour_of_the_year_yields_exact_width() {
        let mut time = at(1, 1, 0, 0, 0);
        let end = at(12, 31, 23, 0, 0);
        while time <= end {
            let window = TimeWindow::around(time);
            assert!(window.start < window.end);
            assert_eq!(window.duration(), half_window() * 2);
            time += Duration::hours(7);
        }
    }
}
