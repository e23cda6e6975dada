//! Row filtering ahead of aggregation.
//!
//! A record survives only when it starts inside the analysis window, carries
//! a subject that is not excluded, is marked "Busy" and does not end before
//! it starts.

use std::collections::BTreeSet;

use chrono::Duration;
use meeting_core::models::MeetingRecord;
use meeting_core::time_utils::AnalysisWindow;
use serde::Serialize;
use tracing::{debug, warn};

/// Subjects that are always excluded, before any user-supplied ones.
pub const DEFAULT_EXCLUDED_SUBJECTS: &[&str] = &[];

// ── ExclusionSet ──────────────────────────────────────────────────────────────

/// Subjects whose meetings are dropped. Matching is exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    subjects: BTreeSet<String>,
}

impl ExclusionSet {
    /// Build the set from free text such as `"Team Sync, Standup"`.
    ///
    /// The text is split on commas and each item trimmed; empty items are
    /// ignored. The result is unioned with [`DEFAULT_EXCLUDED_SUBJECTS`].
    pub fn parse(text: &str) -> Self {
        let subjects = DEFAULT_EXCLUDED_SUBJECTS
            .iter()
            .map(|s| s.to_string())
            .chain(
                text.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            )
            .collect();
        Self { subjects }
    }

    pub fn contains(&self, subject: &str) -> bool {
        self.subjects.contains(subject)
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Excluded subjects in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.subjects.iter().map(String::as_str)
    }
}

// ── Drop reasons ──────────────────────────────────────────────────────────────

/// Why a record was removed by [`filter_records`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    OutsideWindow,
    ExcludedSubject,
    MissingSubject,
    NotBusy,
    NegativeDuration,
}

/// Per-reason counts of dropped rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterStats {
    pub outside_window: usize,
    pub excluded_subject: usize,
    pub missing_subject: usize,
    pub not_busy: usize,
    pub negative_duration: usize,
}

impl FilterStats {
    fn record(&mut self, reason: DropReason) {
        match reason {
            DropReason::OutsideWindow => self.outside_window += 1,
            DropReason::ExcludedSubject => self.excluded_subject += 1,
            DropReason::MissingSubject => self.missing_subject += 1,
            DropReason::NotBusy => self.not_busy += 1,
            DropReason::NegativeDuration => self.negative_duration += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.outside_window
            + self.excluded_subject
            + self.missing_subject
            + self.not_busy
            + self.negative_duration
    }
}

/// Records kept by [`filter_records`] plus counts of what was dropped.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub records: Vec<MeetingRecord>,
    pub stats: FilterStats,
}

// ── Filter ────────────────────────────────────────────────────────────────────

/// First predicate `record` fails, or `None` when it should be kept.
pub fn drop_reason(
    record: &MeetingRecord,
    exclusions: &ExclusionSet,
    window: &AnalysisWindow,
) -> Option<DropReason> {
    if !window.contains(&record.start_time) {
        return Some(DropReason::OutsideWindow);
    }
    match record.subject.as_deref() {
        None => return Some(DropReason::MissingSubject),
        Some(subject) if exclusions.contains(subject) => {
            return Some(DropReason::ExcludedSubject)
        }
        Some(_) => {}
    }
    if !record.is_busy() {
        return Some(DropReason::NotBusy);
    }
    if record.duration() < Duration::zero() {
        return Some(DropReason::NegativeDuration);
    }
    None
}

/// Keep only the records that pass every predicate, preserving order.
pub fn filter_records(
    records: Vec<MeetingRecord>,
    exclusions: &ExclusionSet,
    window: &AnalysisWindow,
) -> FilterOutcome {
    let mut stats = FilterStats::default();
    let mut kept = Vec::with_capacity(records.len());

    for record in records {
        match drop_reason(&record, exclusions, window) {
            None => kept.push(record),
            Some(DropReason::NegativeDuration) => {
                warn!(
                    "Dropping meeting on line {}: ends at {} before it starts at {}",
                    record.line, record.end_time, record.start_time
                );
                stats.record(DropReason::NegativeDuration);
            }
            Some(reason) => stats.record(reason),
        }
    }

    debug!(
        "Filter kept {} rows, dropped {} (window {}, excluded {}, no subject {}, not busy {}, negative {})",
        kept.len(),
        stats.total(),
        stats.outside_window,
        stats.excluded_subject,
        stats.missing_subject,
        stats.not_busy,
        stats.negative_duration,
    );

    FilterOutcome {
        records: kept,
        stats,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use meeting_core::models::BUSY_STATUS;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn meeting(subject: Option<&str>, start: NaiveDateTime, minutes: i64) -> MeetingRecord {
        MeetingRecord {
            line: 2,
            subject: subject.map(str::to_string),
            start_time: start,
            end_time: start + Duration::minutes(minutes),
            show_time_as: Some(BUSY_STATUS),
        }
    }

    fn run(records: Vec<MeetingRecord>, exclusions: &str) -> FilterOutcome {
        filter_records(
            records,
            &ExclusionSet::parse(exclusions),
            &AnalysisWindow::default(),
        )
    }

    // ── ExclusionSet ──────────────────────────────────────────────────────────

    #[test]
    fn test_exclusion_set_parse_trims_items() {
        let set = ExclusionSet::parse(" Team Sync ,Standup,  Lunch");
        assert_eq!(set.len(), 3);
        assert!(set.contains("Team Sync"));
        assert!(set.contains("Standup"));
        assert!(set.contains("Lunch"));
        assert!(!set.contains(" Team Sync "));
    }

    #[test]
    fn test_exclusion_set_empty_text() {
        let set = ExclusionSet::parse("");
        assert!(set.is_empty());
        let set = ExclusionSet::parse(" , ,");
        assert!(set.is_empty());
    }

    #[test]
    fn test_exclusion_set_deduplicates_and_sorts() {
        let set = ExclusionSet::parse("b, a, b");
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    // ── Window predicate ──────────────────────────────────────────────────────

    #[test]
    fn test_window_boundaries() {
        let outcome = run(
            vec![
                meeting(Some("Before"), at(2023, 12, 31, 23, 59, 59), 30),
                meeting(Some("First"), at(2024, 1, 1, 0, 0, 0), 30),
                meeting(Some("Last day"), at(2024, 12, 31, 17, 0, 0), 30),
                meeting(Some("After"), at(2025, 1, 1, 0, 0, 0), 30),
            ],
            "",
        );
        let kept: Vec<_> = outcome
            .records
            .iter()
            .map(|r| r.subject.as_deref().unwrap())
            .collect();
        assert_eq!(kept, vec!["First", "Last day"]);
        assert_eq!(outcome.stats.outside_window, 2);
    }

    // ── Subject predicate ─────────────────────────────────────────────────────

    #[test]
    fn test_exclusion_is_case_sensitive() {
        let start = at(2024, 3, 4, 9, 0, 0);
        let outcome = run(
            vec![
                meeting(Some("Team Sync"), start, 30),
                meeting(Some("team sync"), start, 30),
                meeting(Some("Standup"), start, 15),
            ],
            "Team Sync, Standup",
        );
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].subject.as_deref(), Some("team sync"));
        assert_eq!(outcome.stats.excluded_subject, 2);
    }

    #[test]
    fn test_missing_subject_dropped() {
        let outcome = run(vec![meeting(None, at(2024, 3, 4, 9, 0, 0), 30)], "");
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.stats.missing_subject, 1);
    }

    // ── Status predicate ──────────────────────────────────────────────────────

    #[test]
    fn test_non_busy_dropped() {
        let mut tentative = meeting(Some("Maybe"), at(2024, 3, 4, 9, 0, 0), 30);
        tentative.show_time_as = Some(1);
        let mut unknown = meeting(Some("Unknown"), at(2024, 3, 4, 9, 0, 0), 30);
        unknown.show_time_as = None;

        let outcome = run(vec![tentative, unknown], "");
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.stats.not_busy, 2);
    }

    // ── Duration predicate ────────────────────────────────────────────────────

    #[test]
    fn test_negative_duration_dropped_zero_kept() {
        let start = at(2024, 3, 4, 9, 0, 0);
        let outcome = run(
            vec![
                meeting(Some("Backwards"), start, -30),
                meeting(Some("Reminder"), start, 0),
            ],
            "",
        );
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].subject.as_deref(), Some("Reminder"));
        assert_eq!(outcome.stats.negative_duration, 1);
    }

    // ── Properties ────────────────────────────────────────────────────────────

    fn mixed_records() -> Vec<MeetingRecord> {
        let mut not_busy = meeting(Some("Free"), at(2024, 5, 1, 9, 0, 0), 60);
        not_busy.show_time_as = Some(0);
        vec![
            meeting(Some("Old"), at(2023, 6, 1, 9, 0, 0), 30),
            meeting(Some("Review"), at(2024, 2, 1, 9, 0, 0), 30),
            meeting(Some("Standup"), at(2024, 2, 2, 9, 0, 0), 15),
            meeting(None, at(2024, 2, 3, 9, 0, 0), 45),
            not_busy,
            meeting(Some("Retro"), at(2024, 6, 1, 15, 0, 0), 60),
        ]
    }

    #[test]
    fn test_filter_is_idempotent() {
        let exclusions = ExclusionSet::parse("Standup");
        let window = AnalysisWindow::default();

        let once = filter_records(mixed_records(), &exclusions, &window);
        let twice = filter_records(once.records.clone(), &exclusions, &window);

        assert_eq!(once.records, twice.records);
        assert_eq!(twice.stats.total(), 0);
    }

    #[test]
    fn test_every_kept_record_passes_all_predicates() {
        let exclusions = ExclusionSet::parse("Standup");
        let window = AnalysisWindow::default();
        let outcome = filter_records(mixed_records(), &exclusions, &window);

        assert_eq!(outcome.records.len(), 2);
        for r in &outcome.records {
            assert!(window.contains(&r.start_time));
            let subject = r.subject.as_deref().expect("subject present");
            assert!(!exclusions.contains(subject));
            assert!(r.is_busy());
            assert!(r.duration() >= Duration::zero());
        }
        assert_eq!(outcome.stats.total(), 4);
    }

    #[test]
    fn test_filter_preserves_order() {
        let outcome = run(mixed_records(), "");
        let starts: Vec<_> = outcome.records.iter().map(|r| r.start_time).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
    }
}
