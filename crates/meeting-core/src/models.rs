use chrono::{Datelike, Duration, NaiveDateTime};
use serde::Serialize;

/// `Show time as` code that marks a meeting as "Busy".
pub const BUSY_STATUS: i64 = 2;

/// A single meeting row read from a calendar export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRecord {
    /// 1-based line in the source CSV (the header is line 1).
    pub line: u64,
    /// Meeting title; `None` when the cell was empty.
    pub subject: Option<String>,
    /// Local start timestamp (no timezone attached).
    pub start_time: NaiveDateTime,
    /// Local end timestamp (no timezone attached).
    pub end_time: NaiveDateTime,
    /// Raw `Show time as` code; `None` when empty or not an integer.
    pub show_time_as: Option<i64>,
}

impl MeetingRecord {
    /// `end_time - start_time`. Negative when the row ends before it starts.
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Duration in fractional minutes.
    pub fn duration_minutes(&self) -> f64 {
        self.duration().num_seconds() as f64 / 60.0
    }

    pub fn start_month(&self) -> u32 {
        self.start_time.month()
    }

    pub fn start_day(&self) -> u32 {
        self.start_time.day()
    }

    /// Whether the `Show time as` code is [`BUSY_STATUS`].
    pub fn is_busy(&self) -> bool {
        self.show_time_as == Some(BUSY_STATUS)
    }
}

/// Per-month meeting load statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// Month number, 1–12.
    pub month: u32,
    /// English month name, e.g. `"March"`.
    pub month_name: String,
    /// Distinct days of the month with at least one meeting.
    pub days_with_meetings: u32,
    pub meeting_count: u32,
    /// Summed meeting duration in hours.
    pub total_hours: f64,
    /// `meeting_count / days_with_meetings`, one decimal, half-to-even.
    pub meetings_per_day: f64,
    /// `total_hours * 60 / meeting_count`, truncated.
    pub avg_meeting_length_minutes: i64,
}

/// Totals across every month of a summary table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTotals {
    /// Number of months with meetings.
    pub months: u32,
    pub days_with_meetings: u32,
    pub meeting_count: u32,
    pub total_hours: f64,
    pub meetings_per_day: f64,
    pub avg_meeting_length_minutes: i64,
}

/// How often a subject occurs in the analysed meetings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectCount {
    pub subject: String,
    pub count: u32,
}

/// Round to one decimal place, ties to even.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// `meetings / days` rounded with [`round_one_decimal`]; `0.0` when `days`
/// is zero.
pub fn meetings_per_day(meetings: u32, days: u32) -> f64 {
    if days == 0 {
        return 0.0;
    }
    round_one_decimal(f64::from(meetings) / f64::from(days))
}

/// `hours * 60 / meetings` truncated toward zero; `0` when `meetings` is zero.
pub fn avg_meeting_length_minutes(total_hours: f64, meetings: u32) -> i64 {
    if meetings == 0 {
        return 0;
    }
    (total_hours * 60.0 / f64::from(meetings)) as i64
}
