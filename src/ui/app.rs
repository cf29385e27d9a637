//! Main TUI application state and logic

use crate::parser::parse::ParseOutcome;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
};
use rustc_hash::FxHashMap;
use std::io;
use std::time::{Duration, Instant};

use super::panes::{SourceScrollState, TraceScrollState};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Trace,
    Diagnostics,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> trace -> diagnostics)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Trace,
            FocusedPane::Trace => FocusedPane::Diagnostics,
            FocusedPane::Diagnostics => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Diagnostics,
            FocusedPane::Trace => FocusedPane::Source,
            FocusedPane::Diagnostics => FocusedPane::Trace,
        }
    }
}

/// The main application state
pub struct App {
    /// Result of checking `source_code`
    pub outcome: ParseOutcome,

    /// The source code that was checked
    pub source_code: String,

    /// Index of the selected trace entry
    pub position: usize,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll state
    pub source_scroll: SourceScrollState,
    pub trace_scroll: TraceScrollState,
    pub diagnostics_scroll: usize,

    /// Number of diagnostics per source line
    pub diagnostic_lines: FxHashMap<usize, usize>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app over a finished parse of `source_code`
    pub fn new(outcome: ParseOutcome, source_code: String) -> Self {
        let mut diagnostic_lines = FxHashMap::default();
        for diagnostic in &outcome.diagnostics {
            *diagnostic_lines.entry(diagnostic.line).or_insert(0) += 1;
        }

        let status_message = match outcome.error_count() {
            0 => String::from("Ready! No syntax errors"),
            n => format!("Ready! {} syntax error(s), press e to jump", n),
        };

        App {
            outcome,
            source_code,
            position: 0,
            focused_pane: FocusedPane::Trace,
            source_scroll: SourceScrollState::default(),
            trace_scroll: TraceScrollState::default(),
            diagnostics_scroll: 0,
            diagnostic_lines,
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Handle auto-play mode
            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_millis(300) {
                if self.step_forward() {
                    self.status_message = "Playing...".to_string();
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn total_steps(&self) -> usize {
        self.outcome.trace.len()
    }

    /// Source line of the selected trace entry, 0 when the trace is empty
    pub fn current_line(&self) -> usize {
        self.outcome
            .trace
            .get(self.position)
            .map_or(0, |entry| entry.line())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes on top, status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(pane_area);

        // Left column: Source (top) | Diagnostics (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        let current_line = self.current_line();

        super::panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            current_line,
            &self.diagnostic_lines,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        super::panes::render_diagnostics_pane(
            frame,
            left_rows[1],
            &self.outcome.diagnostics,
            current_line,
            self.focused_pane == FocusedPane::Diagnostics,
            &mut self.diagnostics_scroll,
        );

        // Right column: the whole rule trace
        super::panes::render_trace_pane(
            frame,
            columns[1],
            &self.outcome.trace,
            self.position,
            self.focused_pane == FocusedPane::Trace,
            &mut self.trace_scroll,
        );

        super::panes::render_status_bar(
            frame,
            status_area,
            &self.status_message,
            self.position,
            self.total_steps(),
            self.outcome.error_count(),
            self.is_playing,
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let stepped = (0..n).take_while(|_| self.step_forward()).count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.status_message = if self.step_backward() {
                    "Stepped backward".to_string()
                } else {
                    "Cannot step backward: at start of trace".to_string()
                };
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.status_message = if self.step_forward() {
                    "Stepped forward".to_string()
                } else {
                    "Cannot step forward: at end of trace".to_string()
                };
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                self.is_playing = false;
                self.jump_to_next_error();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Trace => {
                    self.trace_scroll.follow = false;
                    self.trace_scroll.offset = self.trace_scroll.offset.saturating_sub(1);
                }
                FocusedPane::Diagnostics => {
                    self.diagnostics_scroll = self.diagnostics_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling down makes the current line move up visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Trace => {
                    self.trace_scroll.follow = false;
                    self.trace_scroll.offset = self.trace_scroll.offset.saturating_add(1);
                }
                FocusedPane::Diagnostics => {
                    self.diagnostics_scroll = self.diagnostics_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(Duration::from_secs(1))
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.select(self.total_steps().saturating_sub(1));
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.select(0);
                self.status_message = "Jumped to start".to_string();
            }
            _ => {}
        }
    }

    fn select(&mut self, position: usize) {
        self.position = position;
        self.trace_scroll.follow = true;
    }

    /// Select the next trace entry. Returns false at the end of the trace.
    fn step_forward(&mut self) -> bool {
        if self.position + 1 >= self.total_steps() {
            return false;
        }
        self.select(self.position + 1);
        true
    }

    /// Select the previous trace entry. Returns false at the start.
    fn step_backward(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.select(self.position - 1);
        true
    }

    /// Select the next skipped token after the current entry, wrapping around.
    fn jump_to_next_error(&mut self) {
        let trace = &self.outcome.trace;
        let next = (self.position + 1..trace.len())
            .chain(0..=self.position.min(trace.len().saturating_sub(1)))
            .find(|&idx| trace.get(idx).is_some_and(|entry| entry.is_skip()));

        match next {
            Some(idx) => {
                let ordinal = trace[..=idx].iter().filter(|e| e.is_skip()).count();
                self.select(idx);
                self.status_message = format!(
                    "Error {}/{} on line {}",
                    ordinal,
                    self.outcome.error_count(),
                    self.current_line()
                );
            }
            None => {
                self.status_message = "No syntax errors".to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::parse_source;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn app_for(source: &str) -> App {
        App::new(parse_source(source), source.to_string())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).expect("test terminal");
        terminal.draw(|f| app.render(f)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_step_forward_and_back() {
        let mut app = app_for("$$ $$ $$ $$");
        assert_eq!(app.position, 0);

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.position, 2);

        press(&mut app, KeyCode::Left);
        assert_eq!(app.position, 1);

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.position, 0);
        assert!(app.status_message.contains("Cannot step backward"));
    }

    #[test]
    fn test_number_keys_and_jump_to_end() {
        let mut app = app_for("$$ $$ $$ a = 1; $$");
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.position, 3);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.position, app.outcome.trace.len() - 1);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.position, app.outcome.trace.len() - 1);
    }

    #[test]
    fn test_jump_to_next_error_wraps() {
        let mut app = app_for("$$ $$ $$\na = 1\nb = 2;\n$$");
        assert!(app.outcome.error_count() >= 1);

        press(&mut app, KeyCode::Char('e'));
        let first = app.position;
        assert!(app.outcome.trace[first].is_skip());
        assert_eq!(app.current_line(), 3);

        for _ in 0..app.outcome.error_count() {
            press(&mut app, KeyCode::Char('e'));
        }
        assert_eq!(app.position, first);
    }

    #[test]
    fn test_next_error_without_errors() {
        let mut app = app_for("$$ $$ $$ $$");
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.position, 0);
        assert_eq!(app.status_message, "No syntax errors");
    }

    #[test]
    fn test_focus_cycles() {
        let mut app = app_for("$$ $$ $$ $$");
        assert_eq!(app.focused_pane, FocusedPane::Trace);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Diagnostics);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Source);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Diagnostics);
    }

    #[test]
    fn test_manual_scroll_stops_following() {
        let mut app = app_for("$$ $$ $$ $$");
        press(&mut app, KeyCode::Down);
        assert!(!app.trace_scroll.follow);
        press(&mut app, KeyCode::Right);
        assert!(app.trace_scroll.follow);
    }

    #[test]
    fn test_space_toggles_play() {
        let mut app = app_for("$$ $$ $$ $$");
        press(&mut app, KeyCode::Char(' '));
        assert!(app.is_playing);
        press(&mut app, KeyCode::Right);
        assert!(!app.is_playing);
    }

    #[test]
    fn test_quit() {
        let mut app = app_for("$$ $$ $$ $$");
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_render_shows_panes() {
        let mut app = app_for("$$\n$$\n$$\nx = 1;;\n$$");
        let screen = screen_text(&mut app);

        assert!(screen.contains("Source Code"));
        assert!(screen.contains("Rule Trace"));
        assert!(screen.contains("Diagnostics (1)"));
        assert!(screen.contains("<Rat25S> -> $$"));
        assert!(screen.contains("Step 1/"));
    }

    #[test]
    fn test_render_clean_program() {
        let mut app = app_for("$$ $$ $$ $$");
        let screen = screen_text(&mut app);
        assert!(screen.contains("Diagnostics (0)"));
        assert!(screen.contains("(no syntax errors)"));
    }
}
