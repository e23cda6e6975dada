use std::sync::OnceLock;

use chrono::{Datelike, Month, NaiveDateTime};
use regex::Regex;

use crate::error::{MeetingError, Result};

// ── Calendar export timestamps ────────────────────────────────────────────────

/// `chrono` format of a combined `"<date> <time>"` cell pair, i.e.
/// `MM/DD/YYYY hh:mm:ss AM/PM`.
pub const CALENDAR_TIMESTAMP_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Exact shape of a combined timestamp. `chrono` alone accepts short years
/// and padding spaces inside numeric fields, so the text is checked first.
pub const CALENDAR_TIMESTAMP_PATTERN: &str =
    r"^\d{1,2}/\d{1,2}/\d{4} \d{1,2}:\d{2}:\d{2} [AaPp][Mm]$";

fn timestamp_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| Regex::new(CALENDAR_TIMESTAMP_PATTERN).expect("regex is valid"))
}

/// Year covered by the analysis window.
pub const ANALYSIS_YEAR: i32 = 2024;

/// Combine a date cell and a time cell into one naive local timestamp.
///
/// Leading and trailing whitespace of each cell is ignored. The two values
/// are joined with a single space, checked against
/// [`CALENDAR_TIMESTAMP_PATTERN`] (four-digit year, no inner padding) and
/// parsed with [`CALENDAR_TIMESTAMP_FORMAT`]. There are no fallback formats:
/// anything that does not match exactly is a [`MeetingError::TimestampParse`]
/// carrying the CSV `line` and the combined text.
pub fn parse_calendar_timestamp(date: &str, time: &str, line: u64) -> Result<NaiveDateTime> {
    let combined = format!("{} {}", date.trim(), time.trim());
    let parsed = if timestamp_shape().is_match(&combined) {
        NaiveDateTime::parse_from_str(&combined, CALENDAR_TIMESTAMP_FORMAT).ok()
    } else {
        None
    };
    parsed.ok_or(MeetingError::TimestampParse {
        line,
        value: combined,
    })
}

// ── AnalysisWindow ────────────────────────────────────────────────────────────

/// The calendar-year range a meeting must start in to be analysed.
///
/// The window covers the whole year, last day included:
/// `YYYY-01-01 00:00:00 <= start < (YYYY+1)-01-01 00:00:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisWindow {
    year: i32,
}

impl AnalysisWindow {
    /// Window spanning the given calendar year.
    pub fn calendar_year(year: i32) -> Self {
        Self { year }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Whether `ts` falls inside the window.
    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        ts.year() == self.year
    }

    /// Human-readable range, e.g. `"2024-01-01 to 2024-12-31"`.
    pub fn label(&self) -> String {
        format!("{0}-01-01 to {0}-12-31", self.year)
    }
}

impl Default for AnalysisWindow {
    fn default() -> Self {
        Self::calendar_year(ANALYSIS_YEAR)
    }
}

// ── Month names ───────────────────────────────────────────────────────────────

/// English name for a 1-based month number (`1` → `"January"`).
///
/// Returns `"Unknown"` for numbers outside `1..=12`.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("Unknown")
}

/// Three-letter abbreviation used for chart axes (`1` → `"Jan"`).
pub fn month_abbrev(month: u32) -> &'static str {
    let name = month_name(month);
    name.get(..3).unwrap_or(name)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
