//! Popup TUI application
//!
//! Interactive list of saved timestamps - the terminal stand-in for the
//! extension popup. Jump to a bookmark, delete with confirmation, and
//! watch the list follow store changes.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::{Frame, Terminal};

use super::theme::current_theme;
use crate::controller::{Controller, Tab};
use crate::record::TimestampRecord;

/// UI mode for the popup application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Normal browsing mode
    #[default]
    Normal,
    /// Confirm delete mode
    ConfirmDelete,
}

/// Result of processing one key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    Continue,
    Quit,
}

/// Popup application state over a controller.
pub struct PopupApp<T: Tab> {
    controller: Controller<T>,
    selected: usize,
    mode: Mode,
    status: Option<String>,
}

impl<T: Tab> PopupApp<T> {
    pub fn new(controller: Controller<T>) -> Self {
        Self {
            controller,
            selected: 0,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// The records currently listed: the active video's view when one is
    /// open, the whole collection otherwise.
    pub fn listed_records(&self) -> Vec<TimestampRecord> {
        if self.controller.active_video().is_some() {
            self.controller.visible_records().to_vec()
        } else {
            self.controller.store().borrow().records().to_vec()
        }
    }

    /// Drain store notifications and keep the selection in range.
    pub fn tick(&mut self) {
        self.controller.poll_events();
        let len = self.listed_records().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult {
        match self.mode {
            Mode::Normal => self.handle_normal_key(key.code),
            Mode::ConfirmDelete => self.handle_confirm_key(key.code),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> KeyResult {
        let len = self.listed_records().len();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return KeyResult::Quit,
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 && self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(record) = self.listed_records().get(self.selected).cloned() {
                    self.status = Some(match self.controller.navigate(&record) {
                        Ok(()) => format!("Jumped to {}", record.timestamp),
                        Err(e) => format!("Error: {e}"),
                    });
                }
            }
            KeyCode::Char('d') => {
                if len > 0 {
                    self.mode = Mode::ConfirmDelete;
                }
            }
            _ => {}
        }
        KeyResult::Continue
    }

    fn handle_confirm_key(&mut self, code: KeyCode) -> KeyResult {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let Some(record) = self.listed_records().get(self.selected).cloned() {
                    self.controller.delete(&record.id);
                    self.status = Some(format!("Deleted {}", record.timestamp));
                }
                self.mode = Mode::Normal;
                self.tick();
            }
            _ => {
                self.mode = Mode::Normal;
            }
        }
        KeyResult::Continue
    }
}

/// Create a centered layout with the given constraints.
///
/// Returns the center area that can be used for content.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical_layout[1])[1]
}

fn draw<T: Tab>(frame: &mut Frame, app: &PopupApp<T>) {
    let theme = current_theme();
    let records = app.listed_records();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let title = match app.controller.active_video() {
        Some(video_id) => format!(" Saved timestamps - {video_id} "),
        None => " Saved timestamps ".to_string(),
    };

    let items: Vec<ListItem> = records
        .iter()
        .map(|record| {
            let line = Line::from(vec![
                Span::styled(format!("{:>9} ", record.timestamp), theme.accent_style()),
                Span::styled(record.video_title.clone(), theme.text_style()),
                Span::styled(
                    format!("  ({})", record.saved_at),
                    theme.text_secondary_style(),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(theme.text_secondary_style()),
        )
        .highlight_style(theme.accent_bold_style())
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !records.is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, chunks[0], &mut state);

    let status = app.status().unwrap_or("");
    frame.render_widget(
        Paragraph::new(Span::styled(status, theme.success_style())),
        chunks[1],
    );

    let hints = "enter jump  d delete  j/k move  q quit";
    frame.render_widget(
        Paragraph::new(Span::styled(hints, theme.text_secondary_style()))
            .alignment(Alignment::Center),
        chunks[2],
    );

    if app.mode() == Mode::ConfirmDelete {
        let area = centered_rect(50, 20, frame.area());
        frame.render_widget(Clear, area);
        let label = records
            .get(app.selected())
            .map(|r| r.timestamp.clone())
            .unwrap_or_default();
        let modal = Paragraph::new(format!("Delete bookmark at {label}? [y/N]"))
            .style(Style::default())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Confirm ")
                    .border_style(theme.error_style()),
            );
        frame.render_widget(modal, area);
    }
}

/// Run the popup TUI until the user quits.
pub fn run_popup<T: Tab>(controller: Controller<T>) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = PopupApp::new(controller);
    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

fn run_loop<T: Tab>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut PopupApp<T>,
) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|frame| draw(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_key(key) == KeyResult::Quit {
                    return Ok(());
                }
            }
        }
    }
}
