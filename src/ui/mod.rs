//! Ingestion progress display.
//!
//! [`UiApp`] draws a full-screen ratatui view: phase, gauge, a board with one
//! row per resource and a column per pass, and the activity log. [`LogUi`]
//! writes the same events as `tracing` lines and [`SilentUi`] drops them.

mod components;

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::{Frame, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

use crate::schema::Resource;
use crate::writer::Pass;
use components::{LogPanel, ProgressPanel, ResourceBoard, StatusPanel};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Rebuilding,
    Fetching,
    Linking,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Phase::Rebuilding => "Rebuilding schema",
            Phase::Fetching => "Fetching and loading entities",
            Phase::Linking => "Loading relationships",
            Phase::Complete => "Complete",
        })
    }
}

/// Gauge state for the resource currently being worked on
#[derive(Debug, Clone, Default)]
pub struct Progress {
    pub current: u64,
    pub total: u64,
    pub label: String,
}

impl Progress {
    pub fn new(current: u64, total: u64, label: impl Into<String>) -> Self {
        Self {
            current,
            total,
            label: label.into(),
        }
    }

    /// Completed fraction in `0.0..=1.0`
    pub fn ratio(&self) -> f64 {
        match self.total {
            0 => 0.0,
            total => self.current.min(total) as f64 / total as f64,
        }
    }
}

/// Sink for ingestion events. Every method defaults to a no-op.
pub trait Ui {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_info(&mut self, _info: impl Into<String>) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, _message: impl Into<String>) {}
    /// Record the outcome of one pass for one resource
    fn mark(&mut self, _resource: Resource, _pass: Pass, _ok: bool) {}
}

struct Panels {
    status: StatusPanel,
    progress: ProgressPanel,
    board: ResourceBoard,
    log: LogPanel,
}

impl Panels {
    fn render(&self, frame: &mut Frame) {
        let [status, gauge, board, log]: [Rect; 4] = Layout::vertical([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Length(Resource::ALL.len() as u16 + 4),
            Constraint::Min(5),
        ])
        .areas(frame.area());

        self.status.render(frame, status);
        self.progress.render(frame, gauge);
        self.board.render(frame, board);
        self.log.render(frame, log);
    }
}

/// Full-screen view; owns the terminal until [`UiApp::finish`] or [`UiApp::close`]
pub struct UiApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    panels: Panels,
    active: bool,
}

impl UiApp {
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        io::stdout().execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

        Ok(Self {
            terminal,
            panels: Panels {
                status: StatusPanel::new(),
                progress: ProgressPanel::new(),
                board: ResourceBoard::new(),
                log: LogPanel::new(),
            },
            active: true,
        })
    }

    /// Apply a change to the panels and redraw; a failed draw only loses one frame
    fn update(&mut self, change: impl FnOnce(&mut Panels)) {
        change(&mut self.panels);
        let panels = &self.panels;
        if let Err(e) = self.terminal.draw(|frame| panels.render(frame)) {
            tracing::debug!(error = %e, "redraw failed");
        }
    }

    /// Show the run summary and hold the screen until a key is pressed
    pub fn finish(mut self, summary: &str) -> Result<()> {
        self.update(|panels| {
            panels.status.set_phase(Phase::Complete);
            panels.progress.clear();
            summary.lines().for_each(|line| panels.log.add(line));
            panels.log.add("Press any key to exit...");
        });

        while !matches!(next_event()?, Some(Event::Key(_))) {}

        self.close()
    }

    /// Leave the alternate screen immediately
    pub fn close(mut self) -> Result<()> {
        self.leave()
    }

    fn leave(&mut self) -> Result<()> {
        if !std::mem::replace(&mut self.active, false) {
            return Ok(());
        }
        terminal::disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

fn next_event() -> Result<Option<Event>> {
    if event::poll(Duration::from_millis(100))? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

impl Ui for UiApp {
    fn set_phase(&mut self, phase: Phase) {
        self.update(|panels| panels.status.set_phase(phase));
    }

    fn set_info(&mut self, info: impl Into<String>) {
        self.update(|panels| panels.status.set_info(info));
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        let progress = Progress::new(current, total, label);
        self.update(|panels| panels.progress.set_progress(progress));
    }

    fn clear_progress(&mut self) {
        self.update(|panels| panels.progress.clear());
    }

    fn log(&mut self, message: impl Into<String>) {
        self.update(|panels| panels.log.add(message));
    }

    fn mark(&mut self, resource: Resource, pass: Pass, ok: bool) {
        self.update(|panels| panels.board.mark(resource, pass, ok));
    }
}

impl Drop for UiApp {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

/// Writes phase changes and log lines through `tracing`, for `--plain` runs
#[derive(Debug, Default)]
pub struct LogUi;

impl Ui for LogUi {
    fn set_phase(&mut self, phase: Phase) {
        tracing::info!(%phase, "phase");
    }

    fn set_info(&mut self, info: impl Into<String>) {
        let info: String = info.into();
        tracing::info!("{info}");
    }

    fn log(&mut self, message: impl Into<String>) {
        let message: String = message.into();
        tracing::info!("{message}");
    }
}

/// Discards every event; used by tests and library callers
#[derive(Debug, Default)]
pub struct SilentUi;

impl Ui for SilentUi {}
