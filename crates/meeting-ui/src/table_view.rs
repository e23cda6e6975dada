//! Summary and subject tables.
//!
//! Each table is available both as a bordered [`ratatui::widgets::Table`] for
//! the TUI and as aligned plain text for the non-interactive `table` view.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use meeting_core::formatting;
use meeting_core::models::{MonthlySummary, SubjectCount, SummaryTotals};
use meeting_data::analysis::MeetingAnalysis;

use crate::themes::Theme;

/// Column labels of the monthly summary table.
pub const SUMMARY_COLUMNS: [&str; 6] = [
    "Month",
    "Days / Month",
    "Meeting Count",
    "Total Time (hr)",
    "Meetings / Day",
    "Avg Meeting Length (Min)",
];

/// Column labels of the subject frequency table.
pub const SUBJECT_COLUMNS: [&str; 3] = ["Subject", "Count", "Share"];

// ── Cell text ─────────────────────────────────────────────────────────────────

/// Display cells of one summary row, ordered as [`SUMMARY_COLUMNS`].
pub fn summary_cells(summary: &MonthlySummary) -> [String; 6] {
    [
        summary.month_name.clone(),
        summary.days_with_meetings.to_string(),
        formatting::format_number(f64::from(summary.meeting_count), 0),
        formatting::format_hours(summary.total_hours),
        format!("{:.1}", summary.meetings_per_day),
        summary.avg_meeting_length_minutes.to_string(),
    ]
}

/// Display cells of the totals row.
pub fn totals_cells(totals: &SummaryTotals) -> [String; 6] {
    [
        "TOTAL".to_string(),
        totals.days_with_meetings.to_string(),
        formatting::format_number(f64::from(totals.meeting_count), 0),
        formatting::format_hours(totals.total_hours),
        format!("{:.1}", totals.meetings_per_day),
        totals.avg_meeting_length_minutes.to_string(),
    ]
}

fn subject_cells(count: &SubjectCount, total_meetings: u32) -> [String; 3] {
    [
        count.subject.clone(),
        count.count.to_string(),
        formatting::format_share(count.count, total_meetings),
    ]
}

// ── TUI rendering ─────────────────────────────────────────────────────────────

/// Render the monthly summary table with a highlighted totals row.
pub fn render_summary_table(
    frame: &mut Frame,
    area: Rect,
    summaries: &[MonthlySummary],
    totals: &SummaryTotals,
    theme: &Theme,
) {
    let header = Row::new(
        SUMMARY_COLUMNS
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let mut rows: Vec<Row> = summaries
        .iter()
        .enumerate()
        .map(|(i, summary)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let [month, days, count, hours, per_day, avg] = summary_cells(summary);
            Row::new(vec![
                Cell::from(month),
                Cell::from(days),
                Cell::from(count),
                Cell::from(hours),
                Cell::from(per_day).style(theme.load_style(summary.meetings_per_day)),
                Cell::from(avg),
            ])
            .style(style)
        })
        .collect();

    rows.push(Row::new(totals_cells(totals).map(Cell::from)).style(theme.table_total));

    let widths = [
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(15),
        Constraint::Length(17),
        Constraint::Length(16),
        Constraint::Length(26),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Monthly Meeting Summary "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render the subject frequency table, most frequent first.
pub fn render_subject_table(
    frame: &mut Frame,
    area: Rect,
    counts: &[SubjectCount],
    total_meetings: u32,
    theme: &Theme,
) {
    let header = Row::new(
        SUBJECT_COLUMNS
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    );

    let rows: Vec<Row> = counts
        .iter()
        .enumerate()
        .map(|(i, count)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(subject_cells(count, total_meetings).map(Cell::from)).style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(30),
        Constraint::Length(8),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" Subjects ({}) ", counts.len())),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render a "no meetings" placeholder when nothing survived filtering.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No meetings found", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "No busy meetings in the analysis window survived filtering.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Meeting Analyzer "),
        ),
        area,
    );
}

// ── Plain text ────────────────────────────────────────────────────────────────

/// The complete plain-text report: analysis window, excluded subjects, the
/// summary table and the subject table.
pub fn report_text(analysis: &MeetingAnalysis) -> String {
    let meta = &analysis.metadata;
    let mut out = format!("Analysis window: {}\n", meta.analysis_window);
    if !meta.excluded_subjects.is_empty() {
        out.push_str(&format!("Excluded: {}\n", meta.excluded_subjects.join(", ")));
    }
    out.push_str(&format!(
        "Rows: {} loaded, {} retained\n\n",
        meta.rows_loaded, meta.rows_retained
    ));
    out.push_str(&summary_text(&analysis.summaries, &analysis.totals));
    if !analysis.is_empty() {
        out.push('\n');
        out.push_str(&subject_text(
            &analysis.subject_counts,
            analysis.totals.meeting_count,
        ));
    }
    out
}

/// The summary table as aligned plain text, totals row last.
///
/// An empty `summaries` slice yields a one-line "no meetings" notice.
pub fn summary_text(summaries: &[MonthlySummary], totals: &SummaryTotals) -> String {
    if summaries.is_empty() {
        return "No meetings found.\n".to_string();
    }
    let mut body: Vec<Vec<String>> = summaries
        .iter()
        .map(|s| summary_cells(s).to_vec())
        .collect();
    body.push(totals_cells(totals).to_vec());
    text_table(&SUMMARY_COLUMNS, &body, body.len() - 1)
}

/// The subject frequency table as aligned plain text.
pub fn subject_text(counts: &[SubjectCount], total_meetings: u32) -> String {
    if counts.is_empty() {
        return "No subjects found.\n".to_string();
    }
    let body: Vec<Vec<String>> = counts
        .iter()
        .map(|c| subject_cells(c, total_meetings).to_vec())
        .collect();
    text_table(&SUBJECT_COLUMNS, &body, body.len())
}

/// Lay out `rows` under `headers`. The first column is left aligned, the rest
/// right aligned. A rule is drawn under the header and before row
/// `rule_before`.
fn text_table(headers: &[&str], rows: &[Vec<String>], rule_before: usize) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let rule = format!(
        "{}\n",
        "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1))
    );

    let mut out = format_row(headers.iter().copied(), &widths);
    out.push_str(&rule);
    for (i, row) in rows.iter().enumerate() {
        if i == rule_before {
            out.push_str(&rule);
        }
        out.push_str(&format_row(row.iter().map(String::as_str), &widths));
    }
    out
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let line = cells
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &w))| {
            if i == 0 {
                format!("{:<w$}", cell, w = w)
            } else {
                format!("{:>w$}", cell, w = w)
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    format!("{}\n", line.trim_end())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
