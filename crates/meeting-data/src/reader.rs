//! CSV loading for calendar exports.
//!
//! Reads the Outlook-style "Comma Separated Values" export and converts each
//! row into a [`MeetingRecord`] with combined start/end timestamps.

use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use meeting_core::error::{MeetingError, Result};
use meeting_core::models::MeetingRecord;
use meeting_core::time_utils::parse_calendar_timestamp;
use tracing::debug;

pub const START_DATE: &str = "Start Date";
pub const START_TIME: &str = "Start Time";
pub const END_DATE: &str = "End Date";
pub const END_TIME: &str = "End Time";
pub const SUBJECT: &str = "Subject";
pub const SHOW_TIME_AS: &str = "Show time as";

/// Headers every export must carry. Matching is case-sensitive.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    START_DATE,
    START_TIME,
    END_DATE,
    END_TIME,
    SUBJECT,
    SHOW_TIME_AS,
];

// ── Public API ────────────────────────────────────────────────────────────────

/// Read every row of `input` into a [`MeetingRecord`], sorted by start time.
///
/// The whole input is rejected on the first malformed timestamp or when a
/// required column is missing; no partial result is returned.
pub fn load_meeting_records<R: Read>(input: R) -> Result<Vec<MeetingRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let columns = ColumnIndex::from_headers(reader.headers()?)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        records.push(columns.to_record(&row, line)?);
    }

    // Stable, so rows with equal start times keep file order.
    records.sort_by_key(|r| r.start_time);

    debug!("Loaded {} meeting rows", records.len());
    Ok(records)
}

/// Open `path` and load it with [`load_meeting_records`].
pub fn load_meeting_records_from_path(path: &Path) -> Result<Vec<MeetingRecord>> {
    let file = std::fs::File::open(path).map_err(|source| MeetingError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Reading calendar export {}", path.display());
    load_meeting_records(file)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    start_date: usize,
    start_time: usize,
    end_date: usize,
    end_time: usize,
    subject: usize,
    show_time_as: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == name)
                .ok_or_else(|| MeetingError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            start_date: find(START_DATE)?,
            start_time: find(START_TIME)?,
            end_date: find(END_DATE)?,
            end_time: find(END_TIME)?,
            subject: find(SUBJECT)?,
            show_time_as: find(SHOW_TIME_AS)?,
        })
    }

    fn to_record(&self, row: &StringRecord, line: u64) -> Result<MeetingRecord> {
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let start_time = parse_calendar_timestamp(cell(self.start_date), cell(self.start_time), line)?;
        let end_time = parse_calendar_timestamp(cell(self.end_date), cell(self.end_time), line)?;

        let subject = match cell(self.subject) {
            "" => None,
            s => Some(s.to_string()),
        };

        Ok(MeetingRecord {
            line,
            subject,
            start_time,
            end_time,
            show_time_as: parse_status_code(cell(self.show_time_as)),
        })
    }
}

/// Parse a `Show time as` cell. Accepts `"2"` as well as `"2.0"`; anything
/// else is treated as absent.
fn parse_status_code(cell: &str) -> Option<i64> {
    let trimmed = cell.trim();
    trimmed.parse::<i64>().ok().or_else(|| {
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .map(|v| v as i64)
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str = "Subject,Start Date,Start Time,End Date,End Time,All day event,Show time as";

    fn csv(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.push('\n');
        out
    }

    // ── load_meeting_records ──────────────────────────────────────────────────

    #[test]
    fn test_load_basic_row() {
        let input = csv(&["Design Review,3/5/2024,9:00:00 AM,3/5/2024,10:30:00 AM,False,2"]);
        let records = load_meeting_records(input.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.subject.as_deref(), Some("Design Review"));
        assert_eq!(
            r.start_time,
            NaiveDate::from_ymd_opt(2024, 3, 5)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
        );
        assert_eq!(r.duration_minutes(), 90.0);
        assert_eq!(r.show_time_as, Some(2));
        assert_eq!(r.line, 2);
    }

    #[test]
    fn test_load_sorted_by_start_time() {
        let input = csv(&[
            "Later,3/6/2024,9:00:00 AM,3/6/2024,10:00:00 AM,False,2",
            "Earlier,3/5/2024,9:00:00 AM,3/5/2024,10:00:00 AM,False,2",
            "Earliest,1/2/2024,8:00:00 AM,1/2/2024,8:30:00 AM,False,2",
        ]);
        let records = load_meeting_records(input.as_bytes()).unwrap();
        let subjects: Vec<_> = records.iter().map(|r| r.subject.as_deref().unwrap()).collect();
        assert_eq!(subjects, vec!["Earliest", "Earlier", "Later"]);
    }

    #[test]
    fn test_load_sort_is_stable_for_equal_start() {
        let input = csv(&[
            "First,3/5/2024,9:00:00 AM,3/5/2024,10:00:00 AM,False,2",
            "Second,3/5/2024,9:00:00 AM,3/5/2024,9:30:00 AM,False,2",
        ]);
        let records = load_meeting_records(input.as_bytes()).unwrap();
        assert_eq!(records[0].subject.as_deref(), Some("First"));
        assert_eq!(records[1].subject.as_deref(), Some("Second"));
    }

    #[test]
    fn test_load_empty_subject_is_none() {
        let input = csv(&[",3/5/2024,9:00:00 AM,3/5/2024,10:00:00 AM,False,2"]);
        let records = load_meeting_records(input.as_bytes()).unwrap();
        assert_eq!(records[0].subject, None);
    }

    #[test]
    fn test_load_quoted_subject_with_comma() {
        let input = csv(&["\"Sync, weekly\",3/5/2024,9:00:00 AM,3/5/2024,10:00:00 AM,False,2"]);
        let records = load_meeting_records(input.as_bytes()).unwrap();
        assert_eq!(records[0].subject.as_deref(), Some("Sync, weekly"));
    }

    #[test]
    fn test_load_malformed_time_is_fatal() {
        let input = csv(&[
            "Good,3/5/2024,9:00:00 AM,3/5/2024,10:00:00 AM,False,2",
            "Bad,3/5/2024,09:00,3/5/2024,10:00:00 AM,False,2",
        ]);
        let err = load_meeting_records(input.as_bytes()).unwrap_err();
        match err {
            MeetingError::TimestampParse { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "3/5/2024 09:00");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_malformed_end_date_is_fatal() {
        let input = csv(&["Bad,3/5/2024,9:00:00 AM,2024-03-05,10:00:00 AM,False,2"]);
        assert!(matches!(
            load_meeting_records(input.as_bytes()),
            Err(MeetingError::TimestampParse { .. })
        ));
    }

    #[test]
    fn test_load_two_digit_year_is_fatal() {
        let input = csv(&[
            "Kickoff,3/4/2024,9:00:00 AM,3/4/2024,9:30:00 AM,False,2",
            "Sync,3/5/24,9:00:00 AM,3/5/24,10:00:00 AM,False,2",
        ]);
        let err = load_meeting_records(input.as_bytes()).unwrap_err();
        assert!(matches!(err, MeetingError::TimestampParse { line: 3, .. }));
    }

    #[test]
    fn test_load_space_inside_date_is_fatal() {
        let input = csv(&["Sync,3/ 5/2024,9:00:00 AM,3/5/2024,10:00:00 AM,False,2"]);
        let err = load_meeting_records(input.as_bytes()).unwrap_err();
        assert!(matches!(err, MeetingError::TimestampParse { line: 2, .. }));
    }

    #[test]
    fn test_load_missing_column() {
        let input = "Subject,Start Date,Start Time,End Date,End Time\n\
                     Sync,3/5/2024,9:00:00 AM,3/5/2024,10:00:00 AM\n";
        let err = load_meeting_records(input.as_bytes()).unwrap_err();
        match err {
            MeetingError::MissingColumn(name) => assert_eq!(name, "Show time as"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_column_names_are_case_sensitive() {
        let input = "subject,Start Date,Start Time,End Date,End Time,Show time as\n";
        assert!(matches!(
            load_meeting_records(input.as_bytes()),
            Err(MeetingError::MissingColumn(name)) if name == "Subject"
        ));
    }

    #[test]
    fn test_load_header_only_is_empty() {
        let records = load_meeting_records(csv(&[]).as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_ignores_byte_order_mark() {
        let input = format!(
            "\u{feff}{}",
            csv(&["Sync,3/5/2024,9:00:00 AM,3/5/2024,10:00:00 AM,False,2"])
        );
        let records = load_meeting_records(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
    }

    // ── parse_status_code ─────────────────────────────────────────────────────

    #[test]
    fn test_parse_status_code() {
        assert_eq!(parse_status_code("2"), Some(2));
        assert_eq!(parse_status_code(" 3 "), Some(3));
        assert_eq!(parse_status_code("2.0"), Some(2));
        assert_eq!(parse_status_code("2.5"), None);
        assert_eq!(parse_status_code(""), None);
        assert_eq!(parse_status_code("Busy"), None);
    }

    // ── load_meeting_records_from_path ────────────────────────────────────────

    #[test]
    fn test_load_from_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("calendar.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "{}",
            csv(&["Sync,3/5/2024,9:00:00 AM,3/5/2024,10:00:00 AM,False,2"])
        )
        .unwrap();

        let records = load_meeting_records_from_path(&path).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_load_from_missing_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.csv");
        let err = load_meeting_records_from_path(&path).unwrap_err();
        assert!(matches!(err, MeetingError::FileRead { .. }));
        assert!(err.to_string().contains("absent.csv"));
    }
}
