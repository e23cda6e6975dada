use crate::themes::Theme;
use meeting_core::formatting;
use meeting_core::models::SummaryTotals;
use ratatui::text::{Line, Span};

/// Ornament placed either side of the report title.
pub const ORNAMENT: &str = "◆ ◇ ◆";

/// Width of the separator under the title, in columns.
pub const SEPARATOR_WIDTH: usize = 60;

/// Report header rendering four lines:
///
/// 1. Report title with ornaments (ALL CAPS).
/// 2. A [`SEPARATOR_WIDTH`]-column `=` separator.
/// 3. Source file and analysis window as `[ file | window ]`.
/// 4. Headline totals as `meetings · hours · busy days`.
pub struct Header<'a> {
    /// File name of the calendar export.
    pub source: &'a str,
    /// Analysis window label, e.g. `"2024-01-01 to 2024-12-31"`.
    pub window: &'a str,
    pub totals: &'a SummaryTotals,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        source: &'a str,
        window: &'a str,
        totals: &'a SummaryTotals,
        theme: &'a Theme,
    ) -> Self {
        Self {
            source,
            window,
            totals,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let theme = self.theme;
        vec![
            Line::from(vec![
                Span::styled(ORNAMENT, theme.dim),
                Span::styled(" MEETING LOAD ANALYSIS ", theme.header),
                Span::styled(ORNAMENT, theme.dim),
            ]),
            Line::from(Span::styled("=".repeat(SEPARATOR_WIDTH), theme.separator)),
            Line::from(vec![
                Span::styled("[ ", theme.label),
                Span::styled(self.source, theme.value),
                Span::styled(" | ", theme.label),
                Span::styled(self.window, theme.value),
                Span::styled(" ]", theme.label),
            ]),
            Line::from(vec![
                Span::styled(
                    formatting::format_number(f64::from(self.totals.meeting_count), 0),
                    theme.value,
                ),
                Span::styled(" meetings · ", theme.label),
                Span::styled(formatting::format_hours(self.totals.total_hours), theme.value),
                Span::styled(" h · ", theme.label),
                Span::styled(self.totals.days_with_meetings.to_string(), theme.value),
                Span::styled(" busy days · ", theme.label),
                Span::styled(
                    format!("{:.1}", self.totals.meetings_per_day),
                    theme.load_style(self.totals.meetings_per_day),
                ),
                Span::styled(" per day", theme.label),
            ]),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
