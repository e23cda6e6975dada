//! Chart datasets and renderers for the monthly summaries.
//!
//! Every chart is split into a pure dataset builder, which is unit tested, and
//! a ratatui renderer that draws the dataset into a [`Rect`].

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    symbols::Marker,
    text::Line,
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType, Row, Table,
    },
    Frame,
};

use meeting_core::models::MonthlySummary;
use meeting_core::time_utils::month_abbrev;

use crate::themes::Theme;

/// Window of the moving average drawn on the composite chart.
pub const ROLLING_WINDOW: usize = 3;

/// Metric names of the normalised per-month profile, in column order.
pub const PROFILE_METRICS: [&str; 3] = ["Meeting Count", "Meetings / Day", "Avg Meeting Length (Min)"];

// ── ChartKind ─────────────────────────────────────────────────────────────────

/// The fixed set of charts produced for every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Area,
    PolarBar,
    Scatter3d,
    RadialBar,
    Spider,
    Composite,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::Area,
        ChartKind::PolarBar,
        ChartKind::Scatter3d,
        ChartKind::RadialBar,
        ChartKind::Spider,
        ChartKind::Composite,
    ];

    /// Stable identifier of the chart.
    pub fn key(self) -> &'static str {
        match self {
            ChartKind::Area => "area_chart",
            ChartKind::PolarBar => "polar_bar",
            ChartKind::Scatter3d => "scatter_3d",
            ChartKind::RadialBar => "radial_bar_chart",
            ChartKind::Spider => "spider_plot_with_metrics",
            ChartKind::Composite => "composite_bar_chart",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Area => "Meeting Metrics Area Chart",
            ChartKind::PolarBar => "Meeting Count Polar Distribution",
            ChartKind::Scatter3d => "3D Meeting Metrics Visualization",
            ChartKind::RadialBar => "Radial Meeting Metrics",
            ChartKind::Spider => "Normalized Meeting Metrics by Month",
            ChartKind::Composite => "Meeting Metrics with Moving Averages",
        }
    }

    /// Short label for the tab bar.
    pub fn tab_label(self) -> &'static str {
        match self {
            ChartKind::Area => "Area",
            ChartKind::PolarBar => "Polar",
            ChartKind::Scatter3d => "Scatter",
            ChartKind::RadialBar => "Radial",
            ChartKind::Spider => "Profile",
            ChartKind::Composite => "Trend",
        }
    }

    /// Draw this chart for `summaries` into `area`.
    pub fn render(self, frame: &mut Frame, area: Rect, summaries: &[MonthlySummary], theme: &Theme) {
        match self {
            ChartKind::Area => render_area_chart(frame, area, summaries, theme),
            ChartKind::PolarBar => render_polar_bar(frame, area, summaries, theme),
            ChartKind::Scatter3d => render_scatter(frame, area, summaries, theme),
            ChartKind::RadialBar => render_radial_bar(frame, area, summaries, theme),
            ChartKind::Spider => render_profile(frame, area, summaries, theme),
            ChartKind::Composite => render_composite(frame, area, summaries, theme),
        }
    }
}

// ── Datasets ──────────────────────────────────────────────────────────────────

/// One month as a point in (count, per-day, avg length) space.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub month: u32,
    pub meeting_count: f64,
    pub meetings_per_day: f64,
    pub avg_meeting_length_minutes: f64,
}

/// Min-max normalised metrics of one month, ordered as [`PROFILE_METRICS`].
#[derive(Debug, Clone, PartialEq)]
pub struct MonthProfile {
    pub month_name: String,
    pub values: [f64; 3],
}

/// `(row index, meeting count)` points.
pub fn count_points(summaries: &[MonthlySummary]) -> Vec<(f64, f64)> {
    summaries
        .iter()
        .enumerate()
        .map(|(i, s)| (i as f64, f64::from(s.meeting_count)))
        .collect()
}

/// `(row index, average meeting length)` points.
pub fn length_points(summaries: &[MonthlySummary]) -> Vec<(f64, f64)> {
    summaries
        .iter()
        .enumerate()
        .map(|(i, s)| (i as f64, s.avg_meeting_length_minutes as f64))
        .collect()
}

/// `(month name, meeting count, avg length)` with the latest month first.
pub fn reversed_month_metrics(summaries: &[MonthlySummary]) -> Vec<(String, u64, u64)> {
    summaries
        .iter()
        .rev()
        .map(|s| {
            (
                s.month_name.clone(),
                u64::from(s.meeting_count),
                s.avg_meeting_length_minutes.max(0) as u64,
            )
        })
        .collect()
}

pub fn scatter_points(summaries: &[MonthlySummary]) -> Vec<ScatterPoint> {
    summaries
        .iter()
        .map(|s| ScatterPoint {
            month: s.month,
            meeting_count: f64::from(s.meeting_count),
            meetings_per_day: s.meetings_per_day,
            avg_meeting_length_minutes: s.avg_meeting_length_minutes as f64,
        })
        .collect()
}

/// Scale each metric to `[0, 1]` across the months. A metric whose values are
/// all equal maps to `0.0`.
pub fn normalized_profiles(summaries: &[MonthlySummary]) -> Vec<MonthProfile> {
    let columns: [Vec<f64>; 3] = [
        summaries.iter().map(|s| f64::from(s.meeting_count)).collect(),
        summaries.iter().map(|s| s.meetings_per_day).collect(),
        summaries
            .iter()
            .map(|s| s.avg_meeting_length_minutes as f64)
            .collect(),
    ];
    let ranges = columns.each_ref().map(|col| min_max(col));

    summaries
        .iter()
        .enumerate()
        .map(|(row, s)| {
            let mut values = [0.0; 3];
            for (metric, value) in values.iter_mut().enumerate() {
                let (min, max) = ranges[metric];
                let span = max - min;
                *value = if span > 0.0 {
                    (columns[metric][row] - min) / span
                } else {
                    0.0
                };
            }
            MonthProfile {
                month_name: s.month_name.clone(),
                values,
            }
        })
        .collect()
}

/// Trailing mean over `window` rows; `None` until the window is full.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                let slice = &values[i + 1 - window..=i];
                Some(slice.iter().sum::<f64>() / window as f64)
            }
        })
        .collect()
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Upper axis bound with a little headroom, never below 1.
fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0_f64, f64::max);
    (max * 1.1).ceil().max(1.0)
}

fn month_labels(summaries: &[MonthlySummary]) -> Vec<Line<'static>> {
    summaries
        .iter()
        .map(|s| Line::from(month_abbrev(s.month)))
        .collect()
}

fn y_labels(max: f64) -> Vec<Line<'static>> {
    vec![
        Line::from("0"),
        Line::from(format!("{:.0}", max / 2.0)),
        Line::from(format!("{:.0}", max)),
    ]
}

fn titled_block(kind: ChartKind, theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(format!(" {} ", kind.title()))
}

// ── Renderers ─────────────────────────────────────────────────────────────────

fn render_area_chart(frame: &mut Frame, area: Rect, summaries: &[MonthlySummary], theme: &Theme) {
    let counts = count_points(summaries);
    let lengths = length_points(summaries);
    let y_max = axis_max(counts.iter().chain(lengths.iter()).map(|p| p.1));
    let x_max = (summaries.len().saturating_sub(1)).max(1) as f64;

    let datasets = vec![
        Dataset::default()
            .name("Meeting Count")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.series_count)
            .data(&counts),
        Dataset::default()
            .name("Avg Duration")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.series_length)
            .data(&lengths),
    ];

    let chart = Chart::new(datasets)
        .block(titled_block(ChartKind::Area, theme))
        .x_axis(
            Axis::default()
                .style(theme.label)
                .bounds([0.0, x_max])
                .labels(month_labels(summaries)),
        )
        .y_axis(
            Axis::default()
                .style(theme.label)
                .bounds([0.0, y_max])
                .labels(y_labels(y_max)),
        );
    frame.render_widget(chart, area);
}

fn render_polar_bar(frame: &mut Frame, area: Rect, summaries: &[MonthlySummary], theme: &Theme) {
    let bars: Vec<Bar> = reversed_month_metrics(summaries)
        .into_iter()
        .map(|(name, count, _)| {
            Bar::default()
                .value(count)
                .label(Line::from(name.chars().take(3).collect::<String>()))
                .style(theme.series_count)
        })
        .collect();

    let chart = BarChart::default()
        .block(titled_block(ChartKind::PolarBar, theme))
        .data(BarGroup::default().bars(&bars))
        .bar_width(5)
        .bar_gap(1)
        .value_style(theme.value);
    frame.render_widget(chart, area);
}

fn render_scatter(frame: &mut Frame, area: Rect, summaries: &[MonthlySummary], theme: &Theme) {
    let points = scatter_points(summaries);
    let coords: Vec<[(f64, f64); 1]> = points
        .iter()
        .map(|p| [(p.meeting_count, p.avg_meeting_length_minutes)])
        .collect();

    let datasets: Vec<Dataset> = points
        .iter()
        .zip(coords.iter())
        .enumerate()
        .map(|(i, (p, xy))| {
            Dataset::default()
                .name(format!("{} ({:.1}/day)", month_abbrev(p.month), p.meetings_per_day))
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(theme.series_color(i)))
                .data(xy)
        })
        .collect();

    let x_max = axis_max(points.iter().map(|p| p.meeting_count));
    let y_max = axis_max(points.iter().map(|p| p.avg_meeting_length_minutes));

    let chart = Chart::new(datasets)
        .block(titled_block(ChartKind::Scatter3d, theme))
        .x_axis(
            Axis::default()
                .title("Meeting Count")
                .style(theme.label)
                .bounds([0.0, x_max])
                .labels(y_labels(x_max)),
        )
        .y_axis(
            Axis::default()
                .title("Avg Meeting Length (Min)")
                .style(theme.label)
                .bounds([0.0, y_max])
                .labels(y_labels(y_max)),
        );
    frame.render_widget(chart, area);
}

fn render_radial_bar(frame: &mut Frame, area: Rect, summaries: &[MonthlySummary], theme: &Theme) {
    let metrics = reversed_month_metrics(summaries);
    let groups: Vec<(String, [Bar; 2])> = metrics
        .into_iter()
        .map(|(name, count, length)| {
            let label: String = name.chars().take(3).collect();
            let bars = [
                Bar::default().value(count).style(theme.series_count),
                Bar::default().value(length).style(theme.series_length),
            ];
            (label, bars)
        })
        .collect();

    let mut chart = BarChart::default()
        .block(titled_block(ChartKind::RadialBar, theme))
        .bar_width(3)
        .bar_gap(0)
        .group_gap(2)
        .value_style(theme.value);
    for (label, bars) in &groups {
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(label.clone()))
                .bars(bars),
        );
    }
    frame.render_widget(chart, area);
}

fn render_profile(frame: &mut Frame, area: Rect, summaries: &[MonthlySummary], theme: &Theme) {
    let header = Row::new(
        std::iter::once("Month")
            .chain(PROFILE_METRICS)
            .map(|h| Cell::from(h).style(theme.table_header)),
    );

    let rows: Vec<Row> = normalized_profiles(summaries)
        .into_iter()
        .enumerate()
        .map(|(i, profile)| {
            let style = Style::default().fg(theme.series_color(i));
            let mut cells = vec![Cell::from(profile.month_name)];
            cells.extend(profile.values.iter().map(|v| Cell::from(profile_bar(*v))));
            Row::new(cells).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(18),
        Constraint::Length(18),
        Constraint::Length(26),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(titled_block(ChartKind::Spider, theme));
    frame.render_widget(table, area);
}

/// `0.0..=1.0` as a ten-cell bar followed by the value, e.g. `"█████ 0.50"`.
fn profile_bar(value: f64) -> String {
    let filled = (value.clamp(0.0, 1.0) * 10.0).round() as usize;
    format!("{:<10} {:.2}", "█".repeat(filled), value)
}

fn render_composite(frame: &mut Frame, area: Rect, summaries: &[MonthlySummary], theme: &Theme) {
    let counts = count_points(summaries);
    let lengths = length_points(summaries);
    let length_values: Vec<f64> = lengths.iter().map(|p| p.1).collect();
    let rolling: Vec<(f64, f64)> = rolling_mean(&length_values, ROLLING_WINDOW)
        .into_iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|avg| (i as f64, avg)))
        .collect();

    let y_max = axis_max(counts.iter().chain(lengths.iter()).map(|p| p.1));
    let x_max = (summaries.len().saturating_sub(1)).max(1) as f64;

    let datasets = vec![
        Dataset::default()
            .name("Meeting Count")
            .marker(Marker::HalfBlock)
            .graph_type(GraphType::Bar)
            .style(theme.series_count)
            .data(&counts),
        Dataset::default()
            .name("3-Month Moving Average (Min)")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.series_average)
            .data(&rolling),
        Dataset::default()
            .name("Avg Duration")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.series_length)
            .data(&lengths),
    ];

    let chart = Chart::new(datasets)
        .block(titled_block(ChartKind::Composite, theme))
        .x_axis(
            Axis::default()
                .style(theme.label)
                .bounds([0.0, x_max])
                .labels(month_labels(summaries)),
        )
        .y_axis(
            Axis::default()
                .style(theme.label)
                .bounds([0.0, y_max])
                .labels(y_labels(y_max)),
        );
    frame.render_widget(chart, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
