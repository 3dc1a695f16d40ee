//! UI Components for the terminal interface

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph};
use ratatui::Frame;

use super::{Phase, Progress};
use crate::schema::Resource;
use crate::writer::Pass;

const BORDER: Color = Color::Yellow;

/// Status panel showing current phase and info
pub struct StatusPanel {
    phase: Phase,
    info: String,
}

impl StatusPanel {
    pub fn new() -> Self {
        Self {
            phase: Phase::Rebuilding,
            info: String::new(),
        }
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn set_info(&mut self, info: impl Into<String>) {
        self.info = info.into();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let (indicator, color) = match self.phase {
            Phase::Rebuilding => ("#", Color::Cyan),
            Phase::Fetching => ("↓", Color::Cyan),
            Phase::Linking => ("⇄", Color::Magenta),
            Phase::Complete => ("✓", Color::Green),
        };
        let phase_style = Style::default().fg(color).add_modifier(Modifier::BOLD);

        let lines = vec![
            Line::from(vec![
                Span::styled(format!(" {} ", indicator), phase_style),
                Span::styled(self.phase.to_string(), phase_style),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::raw("   "),
                Span::styled(&self.info, Style::default().fg(Color::Gray)),
            ]),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" SWAPI to SQLite ")
            .border_style(Style::default().fg(BORDER));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

/// Progress panel showing a gauge for the current pass
pub struct ProgressPanel {
    progress: Option<Progress>,
}

impl ProgressPanel {
    pub fn new() -> Self {
        Self { progress: None }
    }

    pub fn set_progress(&mut self, progress: Progress) {
        self.progress = Some(progress);
    }

    pub fn clear(&mut self) {
        self.progress = None;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(BORDER));

        let Some(progress) = &self.progress else {
            frame.render_widget(Paragraph::new("").block(block), area);
            return;
        };

        let label = format!(
            "{} ({}/{} resources)",
            progress.label, progress.current, progress.total
        );
        let gauge = Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(Color::Yellow).bg(Color::DarkGray))
            .ratio(progress.ratio().min(1.0))
            .label(label);

        frame.render_widget(gauge, area);
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Pending,
    Done,
    Failed,
}

impl Mark {
    fn span(self) -> Span<'static> {
        match self {
            Mark::Pending => Span::styled("·", Style::default().fg(Color::DarkGray)),
            Mark::Done => Span::styled("✓", Style::default().fg(Color::Green)),
            Mark::Failed => Span::styled("✗", Style::default().fg(Color::Red)),
        }
    }
}

/// One row per resource: entity pass and relationship pass outcomes
pub struct ResourceBoard {
    rows: Vec<(Resource, Mark, Mark)>,
}

impl ResourceBoard {
    pub fn new() -> Self {
        Self {
            rows: Resource::ALL
                .iter()
                .map(|&r| (r, Mark::Pending, Mark::Pending))
                .collect(),
        }
    }

    pub fn mark(&mut self, resource: Resource, pass: Pass, ok: bool) {
        let mark = if ok { Mark::Done } else { Mark::Failed };
        if let Some(row) = self.rows.iter_mut().find(|(r, _, _)| *r == resource) {
            match pass {
                Pass::Entities => row.1 = mark,
                Pass::Relationships => row.2 = mark,
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Resources  entities / links ")
            .border_style(Style::default().fg(BORDER));

        let items: Vec<ListItem> = self
            .rows
            .iter()
            .map(|(resource, entities, links)| {
                ListItem::new(Line::from(vec![
                    Span::raw(format!(" {:<12}", resource.as_str())),
                    entities.span(),
                    Span::raw("   "),
                    links.span(),
                ]))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}

/// Log panel showing scrollable history
pub struct LogPanel {
    entries: Vec<String>,
    max_entries: usize,
}

impl LogPanel {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            max_entries: 200,
        }
    }

    pub fn add(&mut self, message: impl Into<String>) {
        self.entries.push(message.into());
        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Activity ")
            .border_style(Style::default().fg(BORDER));

        let visible_height = area.height.saturating_sub(2) as usize;
        let start = self.entries.len().saturating_sub(visible_height);
        let newest = self.entries.len().saturating_sub(1);

        let items: Vec<ListItem> = self.entries[start..]
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let style = if start + i == newest {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                ListItem::new(Span::styled(format!(" {}", entry), style))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}
