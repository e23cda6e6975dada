//! Monthly aggregation of filtered meeting records.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Duration;
use meeting_core::models::{
    avg_meeting_length_minutes, meetings_per_day, MeetingRecord, MonthlySummary, SubjectCount,
    SummaryTotals,
};
use meeting_core::time_utils::month_name;

// ── MonthAccumulator ──────────────────────────────────────────────────────────

/// Running totals for one calendar month.
#[derive(Debug, Clone)]
struct MonthAccumulator {
    days: BTreeSet<u32>,
    meeting_count: u32,
    total_duration: Duration,
}

impl Default for MonthAccumulator {
    fn default() -> Self {
        Self {
            days: BTreeSet::new(),
            meeting_count: 0,
            total_duration: Duration::zero(),
        }
    }
}

impl MonthAccumulator {
    fn add_record(&mut self, record: &MeetingRecord) {
        self.days.insert(record.start_day());
        self.meeting_count += 1;
        self.total_duration = self.total_duration + record.duration();
    }

    /// Every accumulator holds at least one record, so the per-day and
    /// average divisions always have a non-zero denominator.
    fn into_summary(self, month: u32) -> MonthlySummary {
        let days_with_meetings = self.days.len() as u32;
        let total_hours = self.total_duration.num_seconds() as f64 / 3600.0;

        MonthlySummary {
            month,
            month_name: month_name(month).to_string(),
            days_with_meetings,
            meeting_count: self.meeting_count,
            total_hours,
            meetings_per_day: meetings_per_day(self.meeting_count, days_with_meetings),
            avg_meeting_length_minutes: avg_meeting_length_minutes(
                total_hours,
                self.meeting_count,
            ),
        }
    }
}

// ── MeetingAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that turns meeting records into summary rows.
pub struct MeetingAggregator;

impl MeetingAggregator {
    /// One [`MonthlySummary`] per start month present in `records`, ascending
    /// by month number. Months without meetings are not emitted.
    pub fn aggregate_monthly(records: &[MeetingRecord]) -> Vec<MonthlySummary> {
        let mut months: BTreeMap<u32, MonthAccumulator> = BTreeMap::new();

        for record in records {
            months
                .entry(record.start_month())
                .or_default()
                .add_record(record);
        }

        months
            .into_iter()
            .map(|(month, acc)| acc.into_summary(month))
            .collect()
    }

    /// Fold monthly rows into a single totals row.
    pub fn calculate_totals(summaries: &[MonthlySummary]) -> SummaryTotals {
        let mut totals = SummaryTotals::default();
        for s in summaries {
            totals.months += 1;
            totals.days_with_meetings += s.days_with_meetings;
            totals.meeting_count += s.meeting_count;
            totals.total_hours += s.total_hours;
        }
        totals.meetings_per_day = meetings_per_day(totals.meeting_count, totals.days_with_meetings);
        totals.avg_meeting_length_minutes =
            avg_meeting_length_minutes(totals.total_hours, totals.meeting_count);
        totals
    }

    /// How many times each subject occurs, most frequent first; ties are
    /// ordered by subject.
    pub fn subject_counts(records: &[MeetingRecord]) -> Vec<SubjectCount> {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for subject in records.iter().filter_map(|r| r.subject.as_deref()) {
            *counts.entry(subject).or_default() += 1;
        }

        let mut result: Vec<SubjectCount> = counts
            .into_iter()
            .map(|(subject, count)| SubjectCount {
                subject: subject.to_string(),
                count,
            })
            .collect();
        result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.subject.cmp(&b.subject)));
        result
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
