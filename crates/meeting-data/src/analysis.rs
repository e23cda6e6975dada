//! End-to-end analysis pipeline.
//!
//! Loads a calendar export, filters it against the fixed analysis window and
//! the exclusion list, and aggregates the survivors into a
//! [`MeetingAnalysis`] ready for the presentation layer.

use std::io::Read;
use std::path::Path;

use chrono::Utc;
use meeting_core::error::Result;
use meeting_core::models::{MeetingRecord, MonthlySummary, SubjectCount, SummaryTotals};
use meeting_core::time_utils::AnalysisWindow;
use serde::Serialize;
use tracing::debug;

use crate::aggregator::MeetingAggregator;
use crate::filter::{filter_records, ExclusionSet, FilterStats};
use crate::reader::{load_meeting_records, load_meeting_records_from_path};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    /// The analysis window, e.g. `"2024-01-01 to 2024-12-31"`.
    pub analysis_window: String,
    /// Subjects that were excluded, sorted.
    pub excluded_subjects: Vec<String>,
    /// Rows read from the export.
    pub rows_loaded: usize,
    /// Rows that survived filtering.
    pub rows_retained: usize,
    /// Why the other rows were dropped.
    pub dropped: FilterStats,
}

/// The complete output of [`analyze_meetings`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingAnalysis {
    /// Filtered records, ascending by start time.
    #[serde(skip)]
    pub records: Vec<MeetingRecord>,
    pub summaries: Vec<MonthlySummary>,
    pub totals: SummaryTotals,
    pub subject_counts: Vec<SubjectCount>,
    pub metadata: AnalysisMetadata,
}

impl MeetingAnalysis {
    /// `true` when no meeting survived filtering.
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Pretty JSON of the summaries, totals, subject counts and metadata.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the pipeline over CSV text from `input`.
///
/// `exclusion_text` is the comma-separated list of subjects to drop.
pub fn analyze_meetings<R: Read>(input: R, exclusion_text: &str) -> Result<MeetingAnalysis> {
    let records = load_meeting_records(input)?;
    Ok(build_analysis(
        records,
        &ExclusionSet::parse(exclusion_text),
        &AnalysisWindow::default(),
    ))
}

/// Same as [`analyze_meetings`] reading the export at `path`.
pub fn analyze_meetings_from_path(path: &Path, exclusion_text: &str) -> Result<MeetingAnalysis> {
    let records = load_meeting_records_from_path(path)?;
    Ok(build_analysis(
        records,
        &ExclusionSet::parse(exclusion_text),
        &AnalysisWindow::default(),
    ))
}

/// Filter and aggregate already-loaded records.
pub fn build_analysis(
    records: Vec<MeetingRecord>,
    exclusions: &ExclusionSet,
    window: &AnalysisWindow,
) -> MeetingAnalysis {
    let rows_loaded = records.len();
    let outcome = filter_records(records, exclusions, window);

    let summaries = MeetingAggregator::aggregate_monthly(&outcome.records);
    let totals = MeetingAggregator::calculate_totals(&summaries);
    let subject_counts = MeetingAggregator::subject_counts(&outcome.records);

    debug!(
        "Analysis: {} rows loaded, {} retained, {} months",
        rows_loaded,
        outcome.records.len(),
        summaries.len()
    );

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        analysis_window: window.label(),
        excluded_subjects: exclusions.iter().map(str::to_string).collect(),
        rows_loaded,
        rows_retained: outcome.records.len(),
        dropped: outcome.stats,
    };

    MeetingAnalysis {
        records: outcome.records,
        summaries,
        totals,
        subject_counts,
        metadata,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
