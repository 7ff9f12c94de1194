//! Request payloads and presentation state for the schedule channel.

use chrono::{NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Default number of days covered by a fresh date range.
pub const DEFAULT_WINDOW_DAYS: i64 = 5;

/// Inclusive calendar window sent with every schedule request.
///
/// Dates serialize as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Window starting today (UTC) and spanning `days` days.
    ///
    /// Returns `None` for a negative length or one that runs past the last
    /// representable date.
    pub fn starting_today(days: i64) -> Option<Self> {
        Self::starting_on(Utc::now().date_naive(), days)
    }

    /// Window starting on `start` and spanning `days` days.
    pub fn starting_on(start: NaiveDate, days: i64) -> Option<Self> {
        if days < 0 {
            return None;
        }
        let end = start.checked_add_signed(TimeDelta::try_days(days)?)?;
        Some(Self { start, end })
    }
}

impl Default for DateRange {
    fn default() -> Self {
        let start = Utc::now().date_naive();
        Self {
            start,
            end: start + TimeDelta::days(DEFAULT_WINDOW_DAYS),
        }
    }
}

/// Body of the `prepare` and `optimize` requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<DateRange> for ScheduleQuery {
    fn from(range: DateRange) -> Self {
        Self {
            start_date: range.start,
            end_date: range.end,
        }
    }
}

/// Body of the `optimize-selected` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedScheduleQuery {
    #[serde(flatten)]
    pub range: ScheduleQuery,
    /// Merge keys of the ships to optimize
    pub selected_ships: Vec<String>,
}

/// Which collection the presentation layer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Baseline list with selection toggles
    #[default]
    List,
    /// Optimized berth chart
    Chart,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_schedule_query_serializes_calendar_dates() {
        let query = ScheduleQuery::from(DateRange::new(date(2025, 10, 1), date(2025, 10, 6)));
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(
            value,
            json!({"start_date": "2025-10-01", "end_date": "2025-10-06"})
        );
    }

    #[test]
    fn test_selected_query_flattens_range() {
        let query = SelectedScheduleQuery {
            range: DateRange::new(date(2025, 10, 1), date(2025, 10, 2)).into(),
            selected_ships: vec!["COIS_GLORYSHIP".to_string()],
        };
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(
            value,
            json!({
                "start_date": "2025-10-01",
                "end_date": "2025-10-02",
                "selected_ships": ["COIS_GLORYSHIP"]
            })
        );
    }

    #[test]
    fn test_default_range_spans_window() {
        let range = DateRange::default();
        assert_eq!((range.end - range.start).num_days(), DEFAULT_WINDOW_DAYS);
    }

    #[test]
    fn test_starting_on_rejects_negative_and_overflowing_lengths() {
        let start = date(2025, 10, 1);

        assert_eq!(
            DateRange::starting_on(start, 5),
            Some(DateRange::new(start, date(2025, 10, 6)))
        );
        assert_eq!(DateRange::starting_on(start, 0), Some(DateRange::new(start, start)));
        assert_eq!(DateRange::starting_on(start, -1), None);
        assert_eq!(DateRange::starting_on(start, 1_000_000_000), None);
        assert_eq!(DateRange::starting_on(start, i64::MAX), None);
        assert!(DateRange::starting_today(1_000_000_000).is_none());
    }

    #[test]
    fn test_view_mode_defaults_to_list() {
        assert_eq!(ViewMode::default(), ViewMode::List);
    }
}
