//! Main TUI application state and logic

use crate::interpreter::constants::DEFAULT_WINDOW_RADIUS;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::EngineError;
use crate::interpreter::input::InputProvider;
use crate::program::Program;
use crate::ui::panes::{self, CursorMark, StatusRenderData};
use crate::variables::value::VarType;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Variables,
    History,
    Console,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> console -> variables -> history)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Console,
            FocusedPane::Console => FocusedPane::Variables,
            FocusedPane::Variables => FocusedPane::History,
            FocusedPane::History => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::History,
            FocusedPane::Console => FocusedPane::Source,
            FocusedPane::Variables => FocusedPane::Console,
            FocusedPane::History => FocusedPane::Variables,
        }
    }
}

/// Keyboard mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Typing the 1-based line number to jump to
    JumpTarget(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Advance,
    StepBack,
    JumpTo(usize),
    Restart,
}

/// Answers `lire` with a modal prompt drawn over the source pane.
///
/// The engine is busy while it waits, so the backdrop is drawn from a copy
/// of the program rather than from the engine.
struct TuiInput<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    program: &'a Program,
    line: usize,
}

impl<B: Backend> InputProvider for TuiInput<'_, B> {
    fn prompt_for_input(&mut self, name: &str, var_type: VarType) -> Option<String> {
        let mut buffer = String::new();
        let label = format!("{} : {}   (Enter to confirm, Esc to close input)", name, var_type);
        let program = self.program;
        let line = self.line;
        let window: Vec<(usize, &str)> = program
            .visible_window(line, DEFAULT_WINDOW_RADIUS)
            .filter_map(|idx| program.line(idx).map(|l| (idx, l)))
            .collect();

        loop {
            self.terminal
                .draw(|f| {
                    let area = f.area();
                    panes::render_source_pane(f, area, &window, line, CursorMark::Input, false);
                    panes::render_prompt(f, "lire", &label, &buffer);
                })
                .ok()?;

            if let Event::Key(key) = event::read().ok()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Enter => return Some(buffer),
                    KeyCode::Esc => return None,
                    KeyCode::Backspace => {
                        buffer.pop();
                    }
                    KeyCode::Char(c) => buffer.push(c),
                    _ => {}
                }
            }
        }
    }
}

/// The main application state
pub struct App {
    /// The interpreter instance
    pub interpreter: Interpreter,

    /// Copy of the program, used as backdrop while the engine waits for input
    program: Program,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    pub mode: Mode,

    /// Row of the variables pane targeted by the trace toggle
    pub selected_variable: usize,

    /// Per-pane scroll offsets
    pub history_scroll: usize,
    pub console_scroll: usize,

    /// Line the engine refused to enter (unterminated block)
    pub halted_line: Option<usize>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
    pub is_error: bool,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    pub fn new(interpreter: Interpreter) -> Self {
        let program = interpreter.program().clone();
        let status_message = match interpreter.diagnostics().len() {
            0 => String::from("Ready!"),
            n => format!("Ready, {} declaration problem(s), see the log", n),
        };
        let is_error = !interpreter.diagnostics().is_empty();

        App {
            interpreter,
            program,
            focused_pane: FocusedPane::Source,
            mode: Mode::Normal,
            selected_variable: 0,
            history_scroll: usize::MAX,
            console_scroll: usize::MAX,
            halted_line: None,
            should_quit: false,
            status_message,
            is_error,
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
            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_secs(1) {
                if !self.navigate(terminal, Command::Advance) || self.interpreter.is_finished() {
                    self.is_playing = false;
                    if !self.is_error {
                        self.status_message = "Playback complete".to_string();
                    }
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key, terminal);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // 4 panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Console (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        // Right column: Variables (top) | Traced history (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        let engine = &self.interpreter;
        let current_line = engine.current_line();

        let radius = (left_rows[0].height.saturating_sub(2) / 2).max(1) as usize;
        let mark = if self.halted_line == Some(current_line) {
            CursorMark::Halted
        } else {
            CursorMark::Current
        };
        panes::render_source_pane(
            frame,
            left_rows[0],
            &engine.visible_line_window(radius),
            current_line,
            mark,
            self.focused_pane == FocusedPane::Source,
        );

        panes::render_console_pane(
            frame,
            left_rows[1],
            &engine.recent_execution_log(engine.config().log_capacity),
            engine.dropped_log_entries(),
            self.focused_pane == FocusedPane::Console,
            &mut self.console_scroll,
        );

        self.selected_variable = self
            .selected_variable
            .min(engine.variables().len().saturating_sub(1));
        panes::render_variables_pane(
            frame,
            right_rows[0],
            engine.variables().iter(),
            self.selected_variable,
            self.focused_pane == FocusedPane::Variables,
        );

        panes::render_history_pane(
            frame,
            right_rows[1],
            engine.traced_history(),
            self.focused_pane == FocusedPane::History,
            &mut self.history_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &StatusRenderData {
                message: &self.status_message,
                steps: engine.steps(),
                current_line,
                total_lines: engine.program().len(),
                is_error: self.is_error,
                is_playing: self.is_playing,
                is_finished: engine.is_finished(),
                is_input: matches!(self.mode, Mode::JumpTarget(_)),
            },
        );

        if let Mode::JumpTarget(buffer) = &self.mode {
            let label = format!("line number, 1 to {}", engine.program().len());
            panes::render_prompt(frame, "go to line", &label, buffer);
        }
    }

    /// Handle keyboard events
    fn handle_key_event<B: Backend>(&mut self, key: KeyEvent, terminal: &mut Terminal<B>) {
        if let Mode::JumpTarget(buffer) = &mut self.mode {
            match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() => buffer.push(c),
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Esc => self.mode = Mode::Normal,
                KeyCode::Enter => {
                    let requested = buffer.parse::<usize>().ok();
                    self.mode = Mode::Normal;
                    match requested {
                        Some(line) if line > 0 => {
                            self.navigate(terminal, Command::JumpTo(line - 1));
                        }
                        _ => self.show_error("lines are numbered from 1"),
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.interpreter.quit();
                self.should_quit = true;
            }
            // Number keys advance N times
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let mut stepped = 0;
                while stepped < n && self.navigate(terminal, Command::Advance) {
                    stepped += 1;
                }
                if !self.is_error {
                    self.status_message = format!("Advanced {} step(s)", stepped);
                }
            }
            KeyCode::Tab => self.focused_pane = self.focused_pane.next(),
            KeyCode::BackTab => self.focused_pane = self.focused_pane.prev(),
            KeyCode::Left | KeyCode::Char('h') => {
                self.is_playing = false;
                self.navigate(terminal, Command::StepBack);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.is_playing = false;
                self.navigate(terminal, Command::Advance);
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Variables => {
                    self.selected_variable = self.selected_variable.saturating_sub(1)
                }
                FocusedPane::History => {
                    self.history_scroll = self.history_scroll.saturating_sub(1)
                }
                FocusedPane::Console => {
                    self.console_scroll = self.console_scroll.saturating_sub(1)
                }
                FocusedPane::Source => {}
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Variables => {
                    self.selected_variable = self.selected_variable.saturating_add(1)
                }
                FocusedPane::History => {
                    self.history_scroll = self.history_scroll.saturating_add(1)
                }
                FocusedPane::Console => {
                    self.console_scroll = self.console_scroll.saturating_add(1)
                }
                FocusedPane::Source => {}
            },
            KeyCode::Char('t') => self.toggle_trace(),
            KeyCode::Char('g') => {
                self.is_playing = false;
                self.mode = Mode::JumpTarget(String::new());
            }
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
                // Run to the end
                self.is_playing = false;
                while !self.interpreter.is_finished() && self.navigate(terminal, Command::Advance) {}
                if !self.is_error {
                    self.status_message = "Ran to the end".to_string();
                }
            }
            KeyCode::Backspace | KeyCode::Home => {
                self.is_playing = false;
                self.navigate(terminal, Command::Restart);
            }
            _ => {}
        }
    }

    /// Run one navigation command; returns whether it succeeded.
    fn navigate<B: Backend>(&mut self, terminal: &mut Terminal<B>, command: Command) -> bool {
        let mut input = TuiInput {
            terminal,
            program: &self.program,
            line: self.interpreter.current_line(),
        };

        let result = match command {
            Command::Advance => self.interpreter.advance(&mut input),
            Command::StepBack => self.interpreter.step_back(&mut input),
            Command::JumpTo(line) => self.interpreter.jump_to(line, &mut input),
            Command::Restart => self.interpreter.restart(&mut input),
        };

        self.console_scroll = usize::MAX;
        self.history_scroll = usize::MAX;

        match result {
            Ok(()) => {
                self.is_error = false;
                self.halted_line = None;
                self.status_message = match command {
                    Command::Advance if self.interpreter.is_finished() => {
                        "Execution finished".to_string()
                    }
                    Command::Advance => "Advanced".to_string(),
                    Command::StepBack => "Stepped back".to_string(),
                    Command::JumpTo(line) => format!("Jumped to line {}", line + 1),
                    Command::Restart => "Restarted".to_string(),
                };
                true
            }
            Err(err) => {
                if let EngineError::StructuralBlock { line, .. } = err {
                    self.halted_line = Some(line);
                }
                self.show_error(&err.to_string());
                false
            }
        }
    }

    fn toggle_trace(&mut self) {
        let Some((name, traced)) = self
            .interpreter
            .variables()
            .iter()
            .nth(self.selected_variable)
            .map(|v| (v.name().to_string(), v.is_traced()))
        else {
            return;
        };

        match self.interpreter.set_traced(&name, !traced) {
            Ok(true) if traced => self.status_message = format!("'{}' is no longer traced", name),
            Ok(true) => self.status_message = format!("'{}' is now traced", name),
            Ok(false) => self.show_error(&format!("'{}' is a constant", name)),
            Err(err) => self.show_error(&err.to_string()),
        }
    }

    fn show_error(&mut self, message: &str) {
        self.status_message = message.to_string();
        self.is_error = true;
    }
}
