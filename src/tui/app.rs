//! Interactive interface: a kanban board per team, the dashboard, the defect
//! table and the assistant chat, one tab each.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame, Terminal,
};

use crate::assistant::{self, GREETING};
use crate::board::{Board, TaskFilter};
use crate::config::Config;
use crate::confirm::AssumeYes;
use crate::defect::DefectTable;
use crate::display::{defect_detail, initials, task_detail, truncate};
use crate::error::Result;
use crate::fields::{StatusFilter, TaskPriority, TaskStatus};
use crate::roster::TEAMS;
use crate::stats::{compute_stats, recent_tasks, team_performance};
use crate::store::{KeyValueStore, RecordStore};
use crate::tui::colors::{defect_status_color, priority_color, severity_color, status_color, BLUE};
use crate::tui::input::InputField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Board,
    Dashboard,
    Defects,
    Chat,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Board, Tab::Dashboard, Tab::Defects, Tab::Chat];

    fn title(self) -> &'static str {
        match self {
            Tab::Board => "Board",
            Tab::Dashboard => "Dashboard",
            Tab::Defects => "Defects",
            Tab::Chat => "Chat",
        }
    }

    fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }
}

/// A deletion waiting for the y/n answer in the confirmation popup.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingDelete {
    Task(u64),
    Defect(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
}

pub struct App<'a, S: KeyValueStore> {
    store: &'a RecordStore<S>,
    config: &'a Config,
    tab: Tab,

    board: Board,
    filter: TaskFilter,
    filter_active: bool,
    selected_column: usize,
    selected_card: usize,
    show_detail: bool,

    defects: DefectTable,
    defect_state: TableState,

    pending_delete: Option<PendingDelete>,

    chat: Vec<ChatMessage>,
    chat_input: InputField,
    pending_reply: Option<(Instant, String)>,

    status_message: String,
    quit: bool,
}

impl<'a, S: KeyValueStore> App<'a, S> {
    pub fn new(store: &'a RecordStore<S>, config: &'a Config, board_id: &str) -> Result<Self> {
        let board = Board::open(store, board_id)?;
        let defects = DefectTable::load(store);
        let mut defect_state = TableState::default();
        if !defects.defects.is_empty() {
            defect_state.select(Some(0));
        }
        Ok(App {
            store,
            config,
            tab: Tab::Board,
            board,
            filter: TaskFilter::default(),
            filter_active: false,
            selected_column: 0,
            selected_card: 0,
            show_detail: false,
            defects,
            defect_state,
            pending_delete: None,
            chat: vec![ChatMessage { speaker: Speaker::Bot, text: GREETING.to_string() }],
            chat_input: InputField::new(),
            pending_reply: None,
            status_message: String::new(),
            quit: false,
        })
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    // ---- board ------------------------------------------------------------

    fn column_ids(&self, column: usize) -> Vec<u64> {
        self.board.columns(&self.filter)[column].iter().map(|t| t.id).collect()
    }

    fn selected_task_id(&self) -> Option<u64> {
        self.column_ids(self.selected_column).get(self.selected_card).copied()
    }

    fn clamp_selection(&mut self) {
        let len = self.column_ids(self.selected_column).len();
        if len == 0 {
            self.selected_card = 0;
        } else if self.selected_card >= len {
            self.selected_card = len - 1;
        }
    }

    fn switch_board(&mut self) {
        let current = TEAMS.iter().position(|t| t.id == self.board.team.id).unwrap_or(0);
        let next = TEAMS[(current + 1) % TEAMS.len()].id;
        match Board::open(self.store, next) {
            Ok(board) => {
                self.board = board;
                self.selected_column = 0;
                self.selected_card = 0;
                self.show_detail = false;
                self.set_status_message(format!("Switched to {} board", self.board.team.name));
            }
            Err(e) => self.set_status_message(format!("Error: {e}")),
        }
    }

    /// Move the selected card one column left or right.
    fn move_card(&mut self, forward: bool) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let current = TaskStatus::ALL[self.selected_column];
        let target = if forward { current.next() } else { current.prev() };
        let Some(target) = target else {
            return;
        };
        match self.board.move_task(self.store, id, target) {
            Ok(()) => {
                self.selected_column = target.column();
                self.selected_card = self
                    .column_ids(self.selected_column)
                    .iter()
                    .position(|&t| t == id)
                    .unwrap_or(0);
                self.set_status_message(format!("Moved task to {target}"));
            }
            Err(e) => self.set_status_message(format!("Error saving: {e}")),
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent) {
        if self.filter_active {
            match key.code {
                KeyCode::Esc => {
                    self.filter_active = false;
                    self.filter.search.clear();
                    self.status_message.clear();
                }
                KeyCode::Enter => {
                    self.filter_active = false;
                    let shown: usize = self.board.filtered(&self.filter).len();
                    self.set_status_message(format!("Filter: '{}' ({} tasks shown)", self.filter.search, shown));
                }
                KeyCode::Backspace => {
                    self.filter.search.pop();
                }
                KeyCode::Char(c) => self.filter.search.push(c),
                _ => {}
            }
            self.clamp_selection();
            return;
        }

        match key.code {
            KeyCode::Left if key.modifiers.contains(KeyModifiers::CONTROL) => self.move_card(false),
            KeyCode::Right if key.modifiers.contains(KeyModifiers::CONTROL) => self.move_card(true),
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
                self.clamp_selection();
            }
            KeyCode::Right => {
                if self.selected_column + 1 < TaskStatus::ALL.len() {
                    self.selected_column += 1;
                }
                self.clamp_selection();
            }
            KeyCode::Up => self.selected_card = self.selected_card.saturating_sub(1),
            KeyCode::Down => {
                self.selected_card += 1;
                self.clamp_selection();
            }
            KeyCode::Enter => self.show_detail = !self.show_detail && self.selected_task_id().is_some(),
            KeyCode::Char('b') => self.switch_board(),
            KeyCode::Char('s') => {
                // Cycle the status filter: All, then each column in order.
                let statuses = TaskStatus::ALL;
                self.filter.status = match self.filter.status {
                    StatusFilter::All => StatusFilter::Only(statuses[0]),
                    StatusFilter::Only(s) => s.next().into(),
                };
                self.clamp_selection();
            }
            KeyCode::Char('/') => {
                self.filter_active = true;
                self.set_status_message("Filter: type to search story/name, Enter to apply, Esc to cancel");
            }
            KeyCode::Char('x') => {
                if let Some(id) = self.selected_task_id() {
                    self.pending_delete = Some(PendingDelete::Task(id));
                }
            }
            _ => {}
        }
    }

    // ---- defects ----------------------------------------------------------

    fn selected_defect_id(&self) -> Option<String> {
        self.defect_state
            .selected()
            .and_then(|i| self.defects.defects.get(i))
            .map(|d| d.id.clone())
    }

    fn handle_defects_key(&mut self, key: KeyEvent) {
        let len = self.defects.defects.len();
        match key.code {
            KeyCode::Up => {
                if let Some(i) = self.defect_state.selected() {
                    self.defect_state.select(Some(i.saturating_sub(1)));
                }
            }
            KeyCode::Down => {
                if let Some(i) = self.defect_state.selected() {
                    if i + 1 < len {
                        self.defect_state.select(Some(i + 1));
                    }
                }
            }
            KeyCode::Enter => self.show_detail = !self.show_detail && self.selected_defect_id().is_some(),
            KeyCode::Char('r') => {
                self.defects = DefectTable::load(self.store);
                self.clamp_defect_selection();
                self.set_status_message("Reloaded defects");
            }
            KeyCode::Char('x') => {
                if let Some(id) = self.selected_defect_id() {
                    self.pending_delete = Some(PendingDelete::Defect(id));
                }
            }
            _ => {}
        }
    }

    fn clamp_defect_selection(&mut self) {
        let len = self.defects.defects.len();
        let selected = match self.defect_state.selected() {
            _ if len == 0 => None,
            Some(i) if i >= len => Some(len - 1),
            Some(i) => Some(i),
            None => Some(0),
        };
        self.defect_state.select(selected);
    }

    // ---- delete confirmation ---------------------------------------------

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        let Some(pending) = self.pending_delete.take() else {
            return;
        };
        let accepted = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'));
        if !accepted {
            self.set_status_message("Deletion cancelled");
            return;
        }
        // The popup already asked; the operation gets the answer as AssumeYes.
        let result = match &pending {
            PendingDelete::Task(id) => self.board.delete(self.store, *id, &mut AssumeYes),
            PendingDelete::Defect(id) => self.defects.delete(self.store, id, &mut AssumeYes),
        };
        match result {
            Ok(_) => {
                self.show_detail = false;
                self.clamp_selection();
                self.clamp_defect_selection();
                self.set_status_message("Deleted");
            }
            Err(e) => self.set_status_message(format!("Error saving: {e}")),
        }
    }

    // ---- chat -------------------------------------------------------------

    /// Queue the assistant's reply to appear after the typing delay.
    fn submit_chat(&mut self, now: Instant) {
        let query = self.chat_input.take();
        if query.trim().is_empty() {
            return;
        }
        self.deliver_reply(now, true);
        let reply = assistant::resolve(&query, &self.store.load_tasks());
        self.chat.push(ChatMessage { speaker: Speaker::User, text: query });
        self.pending_reply = Some((now + self.config.chat.typing_delay(), reply));
    }

    /// Post the pending reply once its deadline has passed (or when forced).
    fn deliver_reply(&mut self, now: Instant, force: bool) {
        let due = matches!(&self.pending_reply, Some((at, _)) if force || *at <= now);
        if due {
            if let Some((_, text)) = self.pending_reply.take() {
                self.chat.push(ChatMessage { speaker: Speaker::Bot, text });
            }
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Enter => self.submit_chat(now),
            KeyCode::Backspace => self.chat_input.handle_backspace(),
            KeyCode::Delete => self.chat_input.handle_delete(),
            KeyCode::Left => self.chat_input.move_cursor_left(),
            KeyCode::Right => self.chat_input.move_cursor_right(),
            KeyCode::Char(c) => self.chat_input.handle_char(c),
            _ => {}
        }
    }

    // ---- input dispatch ---------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return;
        }
        if self.pending_delete.is_some() {
            self.handle_confirm_key(key);
            return;
        }
        if key.code == KeyCode::Tab {
            self.tab = self.tab.next();
            self.show_detail = false;
            self.filter_active = false;
            return;
        }
        if self.tab == Tab::Chat {
            if key.code == KeyCode::Esc {
                self.quit = true;
            } else {
                self.handle_chat_key(key, now);
            }
            return;
        }
        if !self.filter_active {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') => {
                    if self.show_detail {
                        self.show_detail = false;
                    } else {
                        self.quit = true;
                    }
                    return;
                }
                KeyCode::Char(c @ '1'..='4') => {
                    self.tab = Tab::ALL[c as usize - '1' as usize];
                    self.show_detail = false;
                    return;
                }
                _ => self.status_message.clear(),
            }
        }
        match self.tab {
            Tab::Board => self.handle_board_key(key),
            Tab::Defects => self.handle_defects_key(key),
            Tab::Dashboard | Tab::Chat => {}
        }
    }

    /// Main event loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quit {
            terminal.draw(|f| self.render(f))?;
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key, Instant::now());
                    }
                }
            }
            self.deliver_reply(Instant::now(), false);
        }
        Ok(())
    }

    // ---- rendering --------------------------------------------------------

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Min(0),    // Body
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        let titles: Vec<Line> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, t)| Line::from(format!("{} {}", i + 1, t.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("Team Board"))
            .select(self.tab.index())
            .highlight_style(Style::default().fg(BLUE).add_modifier(Modifier::BOLD));
        f.render_widget(tabs, chunks[0]);

        match self.tab {
            Tab::Board => self.render_board(f, chunks[1]),
            Tab::Dashboard => self.render_dashboard(f, chunks[1]),
            Tab::Defects => self.render_defects(f, chunks[1]),
            Tab::Chat => self.render_chat(f, chunks[1]),
        }
        self.render_status_bar(f, chunks[2]);

        if self.show_detail {
            self.render_detail_popup(f);
        }
        if self.pending_delete.is_some() {
            self.render_confirm_popup(f);
        }
    }

    fn render_board(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);
        let header = Line::from(vec![
            Span::styled(format!("{} Board", self.board.team.name), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  Team: "),
            Span::styled(self.board.team.members.join(", "), Style::default().fg(Color::Cyan)),
        ]);
        f.render_widget(Paragraph::new(header), chunks[0]);

        let columns = self.board.columns(&self.filter);
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 6); 6])
            .split(chunks[1]);

        for (i, (status, tasks)) in TaskStatus::ALL.iter().zip(columns.iter()).enumerate() {
            let is_selected = i == self.selected_column;
            let border_style = if is_selected {
                Style::default().fg(status_color(*status)).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(status_color(*status))
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ({})", status, tasks.len()))
                .border_style(border_style);
            let inner = block.inner(layout[i]);
            f.render_widget(block, layout[i]);

            let card_height: u16 = 4;
            let visible = (inner.height / card_height).max(1) as usize;
            let offset = if is_selected && self.selected_card >= visible {
                self.selected_card + 1 - visible
            } else {
                0
            };
            for (row, (card_index, task)) in tasks.iter().enumerate().skip(offset).take(visible).enumerate() {
                let card_area = Rect {
                    x: inner.x,
                    y: inner.y + row as u16 * card_height,
                    width: inner.width,
                    height: card_height.min(inner.height),
                };
                let selected = is_selected && card_index == self.selected_card;
                let style = if selected {
                    Style::default().bg(status_color(*status)).fg(Color::Black).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().bg(Color::DarkGray)
                };
                let width = card_area.width.saturating_sub(2) as usize;
                let lines = vec![
                    Line::from(truncate(&task.story, width)),
                    Line::from(vec![
                        Span::styled(task.priority.label(), Style::default().fg(priority_color(task.priority))),
                        Span::raw(format!(" [{}] {}", initials(&task.assignee), task.end_date)),
                    ]),
                ];
                let card = Paragraph::new(lines)
                    .block(Block::default().borders(Borders::ALL))
                    .style(style);
                f.render_widget(card, card_area);
            }
        }
    }

    fn render_dashboard(&self, f: &mut Frame, area: Rect) {
        let tasks = self.store.load_tasks();
        let stats = compute_stats(&tasks);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let metrics = Line::from(vec![
            Span::styled(format!("Total Tasks: {}", stats.total), Style::default().fg(BLUE)),
            Span::raw("   "),
            Span::styled(format!("Completed: {}", stats.completed), Style::default().fg(status_color(TaskStatus::Complete))),
            Span::raw("   "),
            Span::styled(format!("In Progress: {}", stats.in_progress), Style::default().fg(priority_color(TaskPriority::Medium))),
        ]);
        f.render_widget(
            Paragraph::new(metrics).block(Block::default().borders(Borders::ALL).title("Project Dashboard")),
            chunks[0],
        );

        let rate = stats.completion_rate();
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Completion Rate"))
            .gauge_style(Style::default().fg(status_color(TaskStatus::Complete)))
            .percent(rate.min(100) as u16)
            .label(format!("{rate}%"));
        f.render_widget(gauge, chunks[1]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);

        let mut left = vec![Line::from(Span::styled("Tasks by Status", Style::default().add_modifier(Modifier::BOLD)))];
        for status in TaskStatus::ALL {
            let count = stats.status_count(status);
            if count > 0 {
                left.push(Line::from(vec![
                    Span::styled(format!("{:<19}", status.label()), Style::default().fg(status_color(status))),
                    Span::raw(format!("{count:>4}")),
                ]));
            }
        }
        left.push(Line::from(""));
        left.push(Line::from(Span::styled("Tasks by Priority", Style::default().add_modifier(Modifier::BOLD))));
        for priority in TaskPriority::ALL {
            let count = stats.priority_count(priority);
            if count > 0 {
                left.push(Line::from(vec![
                    Span::styled(format!("{:<7}", priority.label()), Style::default().fg(priority_color(priority))),
                    Span::raw(format!("{count:>4} {:>4}%", stats.priority_share(priority))),
                ]));
            }
        }
        f.render_widget(Paragraph::new(left).block(Block::default().borders(Borders::ALL)), body[0]);

        let mut right = vec![Line::from(Span::styled("Team Performance", Style::default().add_modifier(Modifier::BOLD)))];
        for row in team_performance(&tasks) {
            right.push(Line::from(format!(
                "[{:<2}] {:<14} {:>3}/{:<3} {:>3}%",
                initials(&row.assignee),
                truncate(&row.assignee, 14),
                row.completed,
                row.total,
                row.success_rate
            )));
        }
        right.push(Line::from(""));
        right.push(Line::from(Span::styled("Recent Tasks", Style::default().add_modifier(Modifier::BOLD))));
        for t in recent_tasks(&tasks, self.config.dashboard.recent_limit) {
            right.push(Line::from(vec![
                Span::raw(format!("{} - {} • ", t.story, t.assignee)),
                Span::styled(t.status.label(), Style::default().fg(status_color(t.status))),
            ]));
        }
        f.render_widget(
            Paragraph::new(right).block(Block::default().borders(Borders::ALL)).wrap(Wrap { trim: true }),
            body[1],
        );
    }

    fn render_defects(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);
        let s = self.defects.stats();
        f.render_widget(
            Paragraph::new(format!(
                "Total: {}  Open: {}  In Progress: {}  Fixed: {}  Closed: {}  Critical: {}  High: {}",
                s.total, s.open, s.in_progress, s.fixed, s.closed, s.critical, s.high
            )),
            chunks[0],
        );

        let header = Row::new(["ID", "Title", "Severity", "Priority", "Status", "Assignee", "Reported", "Environment"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = self
            .defects
            .defects
            .iter()
            .map(|d| {
                Row::new(vec![
                    Cell::from(d.id.clone()),
                    Cell::from(d.title.clone()),
                    Cell::from(Span::styled(d.severity.label(), Style::default().fg(severity_color(d.severity)))),
                    Cell::from(Span::styled(d.priority.label(), Style::default().fg(severity_color(d.priority)))),
                    Cell::from(Span::styled(d.status.label(), Style::default().fg(defect_status_color(d.status)))),
                    Cell::from(d.assignee.clone()),
                    Cell::from(d.reported_date.map(|d| d.to_string()).unwrap_or_default()),
                    Cell::from(d.environment.label()),
                ])
            })
            .collect();
        let widths = [
            Constraint::Length(18),
            Constraint::Min(20),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(11),
            Constraint::Length(12),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Defect Tracker"))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        f.render_stateful_widget(table, chunks[1], &mut self.defect_state);
    }

    fn render_chat(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let mut lines = Vec::new();
        for msg in &self.chat {
            let (who, color) = match msg.speaker {
                Speaker::User => ("You", Color::Cyan),
                Speaker::Bot => ("Assistant", BLUE),
            };
            lines.push(Line::from(Span::styled(who, Style::default().fg(color).add_modifier(Modifier::BOLD))));
            lines.extend(msg.text.lines().map(|l| Line::from(l.to_string())));
            lines.push(Line::from(""));
        }
        if self.pending_reply.is_some() {
            lines.push(Line::from(Span::styled("Assistant is typing…", Style::default().add_modifier(Modifier::ITALIC))));
        }
        let history = Paragraph::new(lines).wrap(Wrap { trim: false });
        let scroll = bottom_scroll(&history, chunks[0]);
        f.render_widget(
            history
                .block(Block::default().borders(Borders::ALL).title("Task Assistant"))
                .scroll((scroll, 0)),
            chunks[0],
        );

        let input = Paragraph::new(self.chat_input.value.as_str())
            .block(Block::default().borders(Borders::ALL).title("Ask about tasks, assignments, or status"));
        f.render_widget(input, chunks[1]);
        f.set_cursor_position((chunks[1].x + 1 + self.chat_input.cursor as u16, chunks[1].y + 1));
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if self.filter_active {
            format!("Filter: {} | Type to search, Enter to apply, Esc to cancel", self.filter.search)
        } else if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.tab {
                Tab::Board => {
                    let status = match self.filter.status {
                        StatusFilter::All => "All".to_string(),
                        StatusFilter::Only(s) => s.to_string(),
                    };
                    format!(
                        "Status: {status} | ←→↑↓: Select | Ctrl+←→: Move | Enter: Details | /: Search | s: Status | b: Board | x: Delete | q: Quit"
                    )
                }
                Tab::Defects => "↑↓: Select | Enter: Details | r: Reload | x: Delete | Tab: Next | q: Quit".to_string(),
                Tab::Dashboard => "Tab: Next | 1-4: Jump | q: Quit".to_string(),
                Tab::Chat => "Enter: Send | Tab: Next | Esc: Quit".to_string(),
            }
        };
        f.render_widget(Paragraph::new(text).style(Style::default().bg(BLUE).fg(Color::White)), area);
    }

    fn render_detail_popup(&self, f: &mut Frame) {
        let text = match self.tab {
            Tab::Board => self.selected_task_id().and_then(|id| self.board.get(id)).map(task_detail),
            Tab::Defects => self
                .selected_defect_id()
                .and_then(|id| self.defects.get(&id))
                .map(defect_detail),
            _ => None,
        };
        let Some(text) = text else {
            return;
        };
        let area = centered_rect(f.area(), 70, 60);
        f.render_widget(Clear, area);
        let popup = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Details (Enter to close)")
                    .title_alignment(Alignment::Center),
            )
            .wrap(Wrap { trim: false })
            .style(Style::default().bg(Color::Black));
        f.render_widget(popup, area);
    }

    fn render_confirm_popup(&self, f: &mut Frame) {
        let prompt = match &self.pending_delete {
            Some(PendingDelete::Task(_)) => "Are you sure you want to delete this task?",
            Some(PendingDelete::Defect(_)) => "Are you sure you want to delete this defect?",
            None => return,
        };
        let area = centered_rect(f.area(), 50, 20);
        f.render_widget(Clear, area);
        let popup = Paragraph::new(vec![Line::from(prompt), Line::from(""), Line::from("y: Delete   any other key: Cancel")])
            .block(Block::default().borders(Borders::ALL).title("Confirm"))
            .alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black));
        f.render_widget(popup, area);
    }
}

/// Rows to skip so the last wrapped line of `text` sits at the bottom of a bordered `area`.
fn bottom_scroll(text: &Paragraph, area: Rect) -> u16 {
    let rows = text.line_count(area.width.saturating_sub(2));
    u16::try_from(rows).unwrap_or(u16::MAX).saturating_sub(area.height.saturating_sub(2))
}

fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
