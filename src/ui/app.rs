//! Main TUI application state and logic

use crate::machine::registers::RegisterId;
use crate::monitor::Sdb;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Prompt shown in front of the input line
pub const PROMPT: &str = "(sdb) ";

/// Oldest console lines are dropped past this many
const CONSOLE_LIMIT: usize = 2000;

/// Rows moved by PgUp / PgDn
const PAGE_STEP: usize = 10;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Console,
    Watchpoints,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Console => FocusedPane::Watchpoints,
            FocusedPane::Watchpoints => FocusedPane::Console,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Echo of a submitted command
    Command,
    Output,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub kind: LineKind,
    pub text: String,
}

/// The main application state
pub struct App {
    /// The debugger session
    pub sdb: Sdb,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Transcript shown in the console pane
    pub console: Vec<ConsoleLine>,

    /// Per-pane scroll offsets
    pub console_scroll: usize,
    pub watch_scroll: usize,

    /// Text typed so far and the cursor position in chars
    pub input: String,
    pub cursor: usize,

    /// Submitted lines, oldest first
    pub history: Vec<String>,

    /// Position while browsing `history` with Up / Down
    history_index: Option<usize>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
    pub status_is_error: bool,
}

impl App {
    pub fn new(sdb: Sdb) -> Self {
        App {
            sdb,
            focused_pane: FocusedPane::Console,
            console: Vec::new(),
            console_scroll: usize::MAX,
            watch_scroll: 0,
            input: String::new(),
            cursor: 0,
            history: Vec::new(),
            history_index: None,
            should_quit: false,
            status_message: String::from("Type 'help' for commands"),
            status_is_error: false,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

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

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        // Console (left) | Watchpoints (right)
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(main_chunks[0]);

        super::panes::render_console_pane(
            frame,
            columns[0],
            &super::panes::ConsoleRenderData {
                lines: &self.console,
                input: &self.input,
                cursor: self.cursor,
            },
            self.focused_pane == FocusedPane::Console,
            &mut self.console_scroll,
        );

        super::panes::render_watchpoints_pane(
            frame,
            columns[1],
            &self.sdb.watchpoints(),
            self.sdb.watchpoint_capacity(),
            self.focused_pane == FocusedPane::Watchpoints,
            &mut self.watch_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &super::panes::StatusRenderData {
                message: &self.status_message,
                is_error: self.status_is_error,
                pc: self.sdb.machine().registers.get(RegisterId::Pc),
            },
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('d') => self.should_quit = true,
                KeyCode::Char('u') => {
                    self.input.clear();
                    self.cursor = 0;
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.input);
                self.cursor = 0;
                self.submit(&line);
            }
            KeyCode::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.input.insert(at, c);
                self.cursor += 1;
                self.history_index = None;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_offset(self.cursor);
                    self.input.remove(at);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.input.chars().count() {
                    let at = self.byte_offset(self.cursor);
                    self.input.remove(at);
                }
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.input.chars().count());
            }
            KeyCode::Home => {
                self.cursor = 0;
            }
            KeyCode::End => {
                self.cursor = self.input.chars().count();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Console => self.history_prev(),
                FocusedPane::Watchpoints => {
                    self.watch_scroll = self.watch_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Console => self.history_next(),
                FocusedPane::Watchpoints => {
                    self.watch_scroll = self.watch_scroll.saturating_add(1);
                }
            },
            KeyCode::PageUp => match self.focused_pane {
                FocusedPane::Console => {
                    let top = self.console_top();
                    self.console_scroll = top.saturating_sub(PAGE_STEP);
                }
                FocusedPane::Watchpoints => {
                    self.watch_scroll = self.watch_scroll.saturating_sub(PAGE_STEP);
                }
            },
            KeyCode::PageDown => match self.focused_pane {
                FocusedPane::Console => {
                    self.console_scroll = self.console_top().saturating_add(PAGE_STEP);
                }
                FocusedPane::Watchpoints => {
                    self.watch_scroll = self.watch_scroll.saturating_add(PAGE_STEP);
                }
            },
            _ => {}
        }
    }

    /// Run one command line and record it in the transcript
    pub fn submit(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }

        self.push_line(LineKind::Command, trimmed.to_string());
        if self.history.last().map(String::as_str) != Some(trimmed) {
            self.history.push(trimmed.to_string());
        }
        self.history_index = None;

        match self.sdb.execute(trimmed) {
            Ok(outcome) => {
                for text in outcome.lines {
                    self.push_line(LineKind::Output, text);
                }
                self.status_message = format!("'{}' ok", trimmed);
                self.status_is_error = false;
                if outcome.quit {
                    self.should_quit = true;
                }
            }
            Err(e) => {
                self.push_line(LineKind::Error, e.to_string());
                self.status_message = e.to_string();
                self.status_is_error = true;
            }
        }

        // follow the bottom after every command
        self.console_scroll = usize::MAX;
    }

    fn push_line(&mut self, kind: LineKind, text: String) {
        self.console.push(ConsoleLine { kind, text });
        if self.console.len() > CONSOLE_LIMIT {
            let excess = self.console.len() - CONSOLE_LIMIT;
            self.console.drain(..excess);
        }
    }

    /// First visible console row, resolving "follow the bottom"
    fn console_top(&self) -> usize {
        self.console_scroll.min(self.console.len().saturating_sub(1))
    }

    fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let index = match self.history_index {
            Some(i) => i.saturating_sub(1),
            None => self.history.len() - 1,
        };
        self.history_index = Some(index);
        self.input = self.history[index].clone();
        self.cursor = self.input.chars().count();
    }

    fn history_next(&mut self) {
        match self.history_index {
            Some(i) if i + 1 < self.history.len() => {
                self.history_index = Some(i + 1);
                self.input = self.history[i + 1].clone();
            }
            Some(_) => {
                self.history_index = None;
                self.input.clear();
            }
            None => {}
        }
        self.cursor = self.input.chars().count();
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_index)
            .map_or(self.input.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_line(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_typed_command_runs() {
        let mut app = App::new(Sdb::default());
        type_line(&mut app, "p 6 * 7");

        assert!(app.input.is_empty());
        assert_eq!(
            app.console,
            vec![
                ConsoleLine {
                    kind: LineKind::Command,
                    text: "p 6 * 7".to_string()
                },
                ConsoleLine {
                    kind: LineKind::Output,
                    text: "42 (0x0000002a)".to_string()
                },
            ]
        );
        assert!(!app.status_is_error);
    }

    #[test]
    fn test_error_goes_to_console_and_status() {
        let mut app = App::new(Sdb::default());
        type_line(&mut app, "p 1/0");

        assert_eq!(app.console.last().map(|l| l.kind), Some(LineKind::Error));
        assert!(app.status_is_error);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_quit_command() {
        let mut app = App::new(Sdb::default());
        type_line(&mut app, "q");
        assert!(app.should_quit);
    }

    #[test]
    fn test_history_navigation() {
        let mut app = App::new(Sdb::default());
        type_line(&mut app, "p 1");
        type_line(&mut app, "p 2");

        press(&mut app, KeyCode::Up);
        assert_eq!(app.input, "p 2");
        press(&mut app, KeyCode::Up);
        assert_eq!(app.input, "p 1");
        press(&mut app, KeyCode::Up);
        assert_eq!(app.input, "p 1");
        press(&mut app, KeyCode::Down);
        assert_eq!(app.input, "p 2");
        press(&mut app, KeyCode::Down);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_cursor_editing() {
        let mut app = App::new(Sdb::default());
        for c in "p 12".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.input, "p 32");
        assert_eq!(app.cursor, 3);

        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.input, " 32");
    }

    #[test]
    fn test_watch_command_updates_session() {
        let mut app = App::new(Sdb::default());
        type_line(&mut app, "w $sp");
        assert_eq!(app.sdb.watchpoints().len(), 1);
    }

    #[test]
    fn test_blank_line_is_ignored() {
        let mut app = App::new(Sdb::default());
        type_line(&mut app, "   ");
        assert!(app.console.is_empty());
        assert!(app.history.is_empty());
    }
}
