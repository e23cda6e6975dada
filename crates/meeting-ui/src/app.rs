//! Application state and TUI event loop for the meeting analyzer.
//!
//! [`App`] owns the theme and the currently selected page. The analysis is
//! computed once before the loop starts, so the loop only redraws and reacts
//! to key presses.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::{Line, Span, Text},
    widgets::{Paragraph, Tabs},
    Frame, Terminal,
};
use tracing::{debug, warn};

use meeting_data::analysis::MeetingAnalysis;

use crate::charts::ChartKind;
use crate::components::header::Header;
use crate::table_view;
use crate::themes::Theme;

// ── Page ──────────────────────────────────────────────────────────────────────

/// One screen of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Summary,
    Subjects,
    Chart(ChartKind),
}

impl Page {
    /// Every page in tab order: the two tables followed by the charts.
    pub fn all() -> Vec<Page> {
        let mut pages = vec![Page::Summary, Page::Subjects];
        pages.extend(ChartKind::ALL.into_iter().map(Page::Chart));
        pages
    }

    pub fn tab_label(self) -> &'static str {
        match self {
            Page::Summary => "Summary",
            Page::Subjects => "Subjects",
            Page::Chart(kind) => kind.tab_label(),
        }
    }
}

// ── KeyAction ─────────────────────────────────────────────────────────────────

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    NextPage,
    PreviousPage,
    Quit,
    Ignore,
}

impl From<KeyEvent> for KeyAction {
    fn from(key: KeyEvent) -> Self {
        if key.kind != KeyEventKind::Press {
            return KeyAction::Ignore;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Tab | KeyCode::Right => KeyAction::NextPage,
            KeyCode::BackTab | KeyCode::Left => KeyAction::PreviousPage,
            _ => KeyAction::Ignore,
        }
    }
}

// ── TerminalGuard ─────────────────────────────────────────────────────────────

/// Leave raw mode and the alternate screen and show the cursor again.
///
/// Every step runs even when an earlier one fails; the first error is returned.
fn restore_terminal() -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
    raw.and(screen)
}

/// Runs `restore` exactly once: through [`TerminalGuard::finish`] on the
/// normal path, or on drop after an early return or a panic.
struct TerminalGuard<F: FnMut() -> io::Result<()>> {
    restore: F,
    armed: bool,
}

impl<F: FnMut() -> io::Result<()>> TerminalGuard<F> {
    fn new(restore: F) -> Self {
        Self {
            restore,
            armed: true,
        }
    }

    fn finish(mut self) -> io::Result<()> {
        self.armed = false;
        (self.restore)()
    }
}

impl<F: FnMut() -> io::Result<()>> Drop for TerminalGuard<F> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = (self.restore)() {
                warn!("Failed to restore terminal: {}", e);
            }
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the report TUI.
pub struct App {
    pub theme: Theme,
    /// File name shown in the header.
    pub source: String,
    pages: Vec<Page>,
    selected: usize,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, source: String) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            source,
            pages: Page::all(),
            selected: 0,
            should_quit: false,
        }
    }

    pub fn current_page(&self) -> Page {
        self.pages[self.selected]
    }

    pub fn next_page(&mut self) {
        self.selected = (self.selected + 1) % self.pages.len();
    }

    pub fn previous_page(&mut self) {
        self.selected = (self.selected + self.pages.len() - 1) % self.pages.len();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match KeyAction::from(key) {
            KeyAction::NextPage => self.next_page(),
            KeyAction::PreviousPage => self.previous_page(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::Ignore => {}
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the report TUI until `q`, `Esc` or `Ctrl+C`.
    ///
    /// The terminal is restored on every exit path once raw mode is on,
    /// including setup failures and panics while drawing.
    pub fn run(mut self, analysis: &MeetingAnalysis) -> io::Result<()> {
        enable_raw_mode()?;
        let guard = TerminalGuard::new(restore_terminal);

        execute!(io::stdout(), EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

        let result = self.event_loop(&mut terminal, analysis);
        let restored = guard.finish();

        result.and(restored)
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        analysis: &MeetingAnalysis,
    ) -> io::Result<()> {
        let tick_rate = Duration::from_millis(250);

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame, analysis))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                    debug!("Key {:?} -> page {:?}", key.code, self.current_page());
                }
            }
        }
        Ok(())
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the header, tab bar, current page and key help into `frame`.
    pub fn render(&self, frame: &mut Frame, analysis: &MeetingAnalysis) {
        let [header_area, tabs_area, body_area, help_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let header = Header::new(
            &self.source,
            &analysis.metadata.analysis_window,
            &analysis.totals,
            &self.theme,
        );
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), header_area);

        let tabs = Tabs::new(self.pages.iter().map(|p| p.tab_label()))
            .select(self.selected)
            .style(self.theme.tab_inactive)
            .highlight_style(self.theme.tab_active)
            .divider(Span::styled("|", self.theme.separator));
        frame.render_widget(tabs, tabs_area);

        if analysis.is_empty() {
            table_view::render_no_data(frame, body_area, &self.theme);
        } else {
            match self.current_page() {
                Page::Summary => table_view::render_summary_table(
                    frame,
                    body_area,
                    &analysis.summaries,
                    &analysis.totals,
                    &self.theme,
                ),
                Page::Subjects => table_view::render_subject_table(
                    frame,
                    body_area,
                    &analysis.subject_counts,
                    analysis.totals.meeting_count,
                    &self.theme,
                ),
                Page::Chart(kind) => kind.render(frame, body_area, &analysis.summaries, &self.theme),
            }
        }

        let help = Line::from(vec![
            Span::styled("Tab/→", self.theme.value),
            Span::styled(" next  ", self.theme.dim),
            Span::styled("Shift+Tab/←", self.theme.value),
            Span::styled(" previous  ", self.theme.dim),
            Span::styled("q", self.theme.value),
            Span::styled(" quit", self.theme.dim),
        ]);
        frame.render_widget(Paragraph::new(help), help_area);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use meeting_data::analysis::analyze_meetings;
    use ratatui::backend::TestBackend;
    use std::cell::Cell;
    use std::panic::AssertUnwindSafe;

    const EXPORT: &str = "\
Subject,Start Date,Start Time,End Date,End Time,Show time as
Kickoff,3/4/2024,9:00:00 AM,3/4/2024,9:30:00 AM,2
Review,3/4/2024,2:00:00 PM,3/4/2024,3:00:00 PM,2
Planning,3/12/2024,10:00:00 AM,3/12/2024,11:30:00 AM,2
Standup,4/2/2024,9:00:00 AM,4/2/2024,9:15:00 AM,2
Standup,4/3/2024,9:00:00 AM,4/3/2024,9:15:00 AM,2
Retro,6/28/2024,3:00:00 PM,6/28/2024,4:00:00 PM,2
";

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn render_to_string(app: &App, analysis: &MeetingAnalysis) -> String {
        let backend = TestBackend::new(120, 32);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| app.render(frame, analysis)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ── Pages ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_page_order() {
        let pages = Page::all();
        assert_eq!(pages.len(), 2 + ChartKind::ALL.len());
        assert_eq!(pages[0], Page::Summary);
        assert_eq!(pages[1], Page::Subjects);
        assert_eq!(pages[2], Page::Chart(ChartKind::Area));
        assert_eq!(pages[7], Page::Chart(ChartKind::Composite));
    }

    #[test]
    fn test_app_creation_defaults() {
        let app = App::new("dark", "calendar.csv".to_string());
        assert_eq!(app.source, "calendar.csv");
        assert_eq!(app.current_page(), Page::Summary);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_app_creation_unknown_theme_falls_back() {
        let app = App::new("neon", String::new());
        assert!(app.theme.header.fg.is_some());
    }

    #[test]
    fn test_next_page_wraps() {
        let mut app = App::new("dark", String::new());
        for _ in 0..Page::all().len() {
            app.next_page();
        }
        assert_eq!(app.current_page(), Page::Summary);
    }

    #[test]
    fn test_previous_page_wraps() {
        let mut app = App::new("dark", String::new());
        app.previous_page();
        assert_eq!(app.current_page(), Page::Chart(ChartKind::Composite));
        app.previous_page();
        assert_eq!(app.current_page(), Page::Chart(ChartKind::Spider));
    }

    // ── Keys ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_key_actions() {
        assert_eq!(KeyAction::from(press(KeyCode::Tab)), KeyAction::NextPage);
        assert_eq!(KeyAction::from(press(KeyCode::Right)), KeyAction::NextPage);
        assert_eq!(KeyAction::from(press(KeyCode::BackTab)), KeyAction::PreviousPage);
        assert_eq!(KeyAction::from(press(KeyCode::Left)), KeyAction::PreviousPage);
        assert_eq!(KeyAction::from(press(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(KeyAction::from(press(KeyCode::Char('x'))), KeyAction::Ignore);
        assert_eq!(
            KeyAction::from(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
        assert_eq!(KeyAction::from(press(KeyCode::Char('c'))), KeyAction::Ignore);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut key = press(KeyCode::Tab);
        key.kind = KeyEventKind::Release;
        assert_eq!(KeyAction::from(key), KeyAction::Ignore);
    }

    #[test]
    fn test_handle_key_navigates_and_quits() {
        let mut app = App::new("dark", String::new());
        app.handle_key(press(KeyCode::Tab));
        assert_eq!(app.current_page(), Page::Subjects);
        app.handle_key(press(KeyCode::Left));
        assert_eq!(app.current_page(), Page::Summary);
        app.handle_key(press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    // ── TerminalGuard ─────────────────────────────────────────────────────────

    fn counting_restore(calls: &Cell<u32>) -> impl FnMut() -> io::Result<()> + '_ {
        move || {
            calls.set(calls.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn test_guard_finish_restores_once() {
        let calls = Cell::new(0);
        let guard = TerminalGuard::new(counting_restore(&calls));
        guard.finish().unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_guard_restores_on_early_return() {
        let calls = Cell::new(0);
        let setup = || -> io::Result<()> {
            let _guard = TerminalGuard::new(counting_restore(&calls));
            Err(io::Error::other("backend unavailable"))
        };
        assert!(setup().is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_guard_restores_on_panic() {
        let calls = Cell::new(0);
        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = TerminalGuard::new(counting_restore(&calls));
            panic!("draw failed");
        }));
        assert!(outcome.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_guard_finish_reports_restore_error() {
        let guard = TerminalGuard::new(|| Err(io::Error::other("tty gone")));
        let err = guard.finish().unwrap_err();
        assert_eq!(err.to_string(), "tty gone");
    }

    // ── Render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_every_page_does_not_panic() {
        let analysis = analyze_meetings(EXPORT.as_bytes(), "").unwrap();
        let mut app = App::new("dark", "calendar.csv".to_string());
        for _ in Page::all() {
            render_to_string(&app, &analysis);
            app.next_page();
        }
    }

    #[test]
    fn test_render_summary_page_content() {
        let analysis = analyze_meetings(EXPORT.as_bytes(), "").unwrap();
        let app = App::new("classic", "calendar.csv".to_string());
        let screen = render_to_string(&app, &analysis);
        assert!(screen.contains("MEETING LOAD ANALYSIS"));
        assert!(screen.contains("calendar.csv"));
        assert!(screen.contains("March"));
        assert!(screen.contains("TOTAL"));
    }

    #[test]
    fn test_render_empty_analysis_shows_placeholder() {
        let analysis = analyze_meetings(EXPORT.as_bytes(), "Kickoff,Review,Planning,Standup,Retro")
            .unwrap();
        assert!(analysis.is_empty());
        let mut app = App::new("dark", "calendar.csv".to_string());
        app.next_page();
        app.next_page();
        let screen = render_to_string(&app, &analysis);
        assert!(screen.contains("No meetings found"));
    }
}
