// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use rolodex_app::sorting::sort_label;
use rolodex_app::{
    AppCommand, AppEvent, ContextId, Coordinator, DetailLayout, DialogId, Notice, PersonField,
    RecordCollection, RemoteEvent, UiState,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::debug;

const MIN_LIST_PERCENT: u16 = 30;
const MAX_LIST_PERCENT: u16 = 80;
const RESIZE_STEP: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    /// How long success and info notices stay in the status bar.
    pub toast_duration: Duration,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            toast_duration: Duration::from_secs(4),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum InputMode {
    #[default]
    Nav,
    Search {
        buffer: String,
    },
    Edit {
        context: ContextId,
        field: PersonField,
        buffer: String,
    },
}

impl InputMode {
    const fn label(&self) -> &'static str {
        match self {
            Self::Nav => "NAV",
            Self::Search { .. } => "SEARCH",
            Self::Edit { .. } => "EDIT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusLine {
    kind: StatusKind,
    text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenDialog {
    id: DialogId,
    text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    mode: InputMode,
    cursor: usize,
    detail_field: usize,
    list_percent: Option<u16>,
    status: Option<StatusLine>,
    status_token: u64,
    dialog: Option<OpenDialog>,
    help_visible: bool,
    toast_duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NavAction {
    Quit,
    MoveRow(isize),
    JumpFirstRow,
    JumpLastRow,
    Select,
    CloseDetail,
    MoveField(isize),
    BeginEdit,
    BeginSearch,
    Resize(i16),
    ToggleHelp,
    Command(AppCommand),
}

pub fn run_app<C: RecordCollection>(
    coordinator: &mut Coordinator<C>,
    remote_rx: &Receiver<RemoteEvent>,
    options: ViewOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData {
        toast_duration: options.toast_duration,
        ..ViewData::default()
    };
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(());
    loop {
        process_remote_events(coordinator, &mut view_data, &internal_tx, remote_rx);
        process_internal_events(&mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, coordinator, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)) {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error).context("poll event");
                break;
            }
        };
        if !has_event {
            continue;
        }
        match event::read() {
            Ok(Event::Key(key)) => {
                if handle_key_event(coordinator, &mut view_data, &internal_tx, key) {
                    break;
                }
            }
            Ok(_) => {}
            Err(error) => {
                result = Err(error).context("read event");
                break;
            }
        }
    }

    coordinator.detach_view();
    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_remote_events<C: RecordCollection>(
    coordinator: &mut Coordinator<C>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    remote_rx: &Receiver<RemoteEvent>,
) {
    while let Ok(remote) = remote_rx.try_recv() {
        let events = coordinator.handle_remote(remote);
        apply_events(coordinator, view_data, internal_tx, events);
    }
}

fn process_internal_events(view_data: &mut ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                view_data.status = None;
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64, after: Duration) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(after);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: StatusKind,
    text: impl Into<String>,
) {
    view_data.status = Some(StatusLine {
        kind,
        text: text.into(),
    });
    view_data.status_token = view_data.status_token.saturating_add(1);
    // Errors stay until the next notice replaces them.
    if kind != StatusKind::Error {
        schedule_status_clear(
            internal_tx,
            view_data.status_token,
            view_data.toast_duration,
        );
    }
}

fn dispatch<C: RecordCollection>(
    coordinator: &mut Coordinator<C>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = coordinator.dispatch(command);
    apply_events(coordinator, view_data, internal_tx, events);
}

fn apply_events<C: RecordCollection>(
    coordinator: &Coordinator<C>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    events: Vec<AppEvent>,
) {
    for event in events {
        match event {
            AppEvent::Notified(Notice::ServiceError { dialog, text }) => {
                view_data.dialog = Some(OpenDialog { id: dialog, text });
            }
            AppEvent::Notified(notice) => {
                let kind = match notice {
                    Notice::Success(_) => StatusKind::Success,
                    Notice::Info(_) => StatusKind::Info,
                    Notice::Error(_) | Notice::ServiceError { .. } => StatusKind::Error,
                };
                emit_status(view_data, internal_tx, kind, notice.text());
            }
            AppEvent::ListSelectionChanged(Some(context)) => {
                move_cursor_to(coordinator, view_data, context);
            }
            AppEvent::FocusRequested(context) => {
                move_cursor_to(coordinator, view_data, context);
                view_data.mode = InputMode::Edit {
                    context,
                    field: PersonField::KEY,
                    buffer: coordinator
                        .collection()
                        .field(context, PersonField::KEY)
                        .unwrap_or_default(),
                };
            }
            AppEvent::DetailChanged(None) => {
                view_data.detail_field = 0;
            }
            AppEvent::DialogClosed(dialog) => {
                if view_data
                    .dialog
                    .as_ref()
                    .is_some_and(|open| open.id == dialog)
                {
                    view_data.dialog = None;
                }
            }
            AppEvent::UiStateChanged(_)
            | AppEvent::ListSelectionChanged(None)
            | AppEvent::DetailChanged(Some(_))
            | AppEvent::LayoutChanged(_)
            | AppEvent::SortChanged(_)
            | AppEvent::FilterChanged(_) => {}
        }
    }
}

fn move_cursor_to<C: RecordCollection>(
    coordinator: &Coordinator<C>,
    view_data: &mut ViewData,
    context: ContextId,
) {
    if let Some(index) = coordinator
        .collection()
        .contexts()
        .iter()
        .position(|candidate| *candidate == context)
    {
        view_data.cursor = index;
    }
}

fn handle_key_event<C: RecordCollection>(
    coordinator: &mut Coordinator<C>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if let Some(open) = &view_data.dialog {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            let dialog = open.id;
            dispatch(
                coordinator,
                view_data,
                internal_tx,
                AppCommand::CloseDialog(dialog),
            );
        }
        return false;
    }

    if view_data.help_visible {
        view_data.help_visible = false;
        return false;
    }

    match std::mem::take(&mut view_data.mode) {
        InputMode::Nav => {
            let Some(action) = nav_action_for_key(key) else {
                return false;
            };
            return apply_nav_action(coordinator, view_data, internal_tx, action);
        }
        InputMode::Search { mut buffer } => match key.code {
            KeyCode::Enter => {
                dispatch(
                    coordinator,
                    view_data,
                    internal_tx,
                    AppCommand::Search(buffer),
                );
                view_data.cursor = 0;
            }
            KeyCode::Esc => {}
            KeyCode::Backspace => {
                buffer.pop();
                view_data.mode = InputMode::Search { buffer };
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                buffer.push(ch);
                view_data.mode = InputMode::Search { buffer };
            }
            _ => view_data.mode = InputMode::Search { buffer },
        },
        InputMode::Edit {
            context,
            field,
            mut buffer,
        } => match key.code {
            KeyCode::Enter => dispatch(
                coordinator,
                view_data,
                internal_tx,
                AppCommand::EditField {
                    context,
                    field,
                    value: buffer,
                },
            ),
            KeyCode::Esc => dispatch(coordinator, view_data, internal_tx, AppCommand::CancelInput),
            KeyCode::Backspace => {
                buffer.pop();
                view_data.mode = InputMode::Edit {
                    context,
                    field,
                    buffer,
                };
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                buffer.push(ch);
                view_data.mode = InputMode::Edit {
                    context,
                    field,
                    buffer,
                };
            }
            _ => {
                view_data.mode = InputMode::Edit {
                    context,
                    field,
                    buffer,
                };
            }
        },
    }
    false
}

fn nav_action_for_key(key: KeyEvent) -> Option<NavAction> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(NavAction::Quit),
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(NavAction::MoveRow(1)),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(NavAction::MoveRow(-1)),
        (KeyCode::Char('g'), _) => Some(NavAction::JumpFirstRow),
        (KeyCode::Char('G'), _) => Some(NavAction::JumpLastRow),
        (KeyCode::Enter, _) => Some(NavAction::Select),
        (KeyCode::Esc, _) => Some(NavAction::CloseDetail),
        (KeyCode::Tab, _) => Some(NavAction::MoveField(1)),
        (KeyCode::BackTab, _) => Some(NavAction::MoveField(-1)),
        (KeyCode::Char('e'), _) => Some(NavAction::BeginEdit),
        (KeyCode::Char('/'), _) => Some(NavAction::BeginSearch),
        (KeyCode::Char('['), _) => Some(NavAction::Resize(-(RESIZE_STEP as i16))),
        (KeyCode::Char(']'), _) => Some(NavAction::Resize(RESIZE_STEP as i16)),
        (KeyCode::Char('?'), _) => Some(NavAction::ToggleHelp),
        (KeyCode::Char('n'), KeyModifiers::NONE) => Some(NavAction::Command(AppCommand::Create)),
        (KeyCode::Char('d'), KeyModifiers::NONE) => Some(NavAction::Command(AppCommand::Delete)),
        (KeyCode::Char('s'), KeyModifiers::NONE) => Some(NavAction::Command(AppCommand::Save)),
        (KeyCode::Char('r'), KeyModifiers::NONE) => {
            Some(NavAction::Command(AppCommand::ResetChanges))
        }
        (KeyCode::Char('R'), _) => Some(NavAction::Command(AppCommand::Refresh)),
        (KeyCode::Char('o'), KeyModifiers::NONE) => Some(NavAction::Command(AppCommand::CycleSort)),
        (KeyCode::Char('X'), _) => Some(NavAction::Command(AppCommand::ResetDataSource)),
        _ => None,
    }
}

/// Returns the reason a command is unavailable right now, if it is.
fn command_blocked(ui: UiState, command: &AppCommand) -> Option<&'static str> {
    if ui.busy {
        return Some("busy -- wait for the pending save to finish");
    }
    match command {
        AppCommand::Save if !ui.save_enabled() => {
            Some("nothing to save, or the user name is still empty")
        }
        AppCommand::ResetChanges if !ui.reset_enabled() => Some("no unsaved changes to reset"),
        AppCommand::CycleSort | AppCommand::Search(_) | AppCommand::ResetDataSource
            if !ui.list_controls_enabled() =>
        {
            Some("save or reset your changes first")
        }
        _ => None,
    }
}

fn apply_nav_action<C: RecordCollection>(
    coordinator: &mut Coordinator<C>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    action: NavAction,
) -> bool {
    let row_count = coordinator.collection().contexts().len();
    match action {
        NavAction::Quit => return true,
        NavAction::MoveRow(delta) => {
            view_data.cursor = shift_index(view_data.cursor, delta, row_count);
        }
        NavAction::JumpFirstRow => view_data.cursor = 0,
        NavAction::JumpLastRow => view_data.cursor = row_count.saturating_sub(1),
        NavAction::Select => {
            let context = coordinator
                .collection()
                .contexts()
                .get(view_data.cursor)
                .copied();
            if context.is_some() {
                dispatch(
                    coordinator,
                    view_data,
                    internal_tx,
                    AppCommand::SelectItem(context),
                );
            }
        }
        NavAction::CloseDetail => {
            if coordinator.detail_context().is_some() {
                dispatch(
                    coordinator,
                    view_data,
                    internal_tx,
                    AppCommand::SelectItem(None),
                );
            }
        }
        NavAction::MoveField(delta) => {
            if coordinator.detail_context().is_some() {
                view_data.detail_field =
                    shift_index(view_data.detail_field, delta, PersonField::ALL.len());
            }
        }
        NavAction::BeginEdit => {
            let Some(context) = coordinator.detail_context() else {
                emit_status(
                    view_data,
                    internal_tx,
                    StatusKind::Info,
                    "select a person with enter before editing",
                );
                return false;
            };
            let field = PersonField::ALL[view_data.detail_field.min(PersonField::ALL.len() - 1)];
            view_data.mode = InputMode::Edit {
                context,
                field,
                buffer: coordinator
                    .collection()
                    .field(context, field)
                    .unwrap_or_default(),
            };
        }
        NavAction::BeginSearch => {
            let probe = AppCommand::Search(String::new());
            if let Some(reason) = command_blocked(coordinator.ui(), &probe) {
                emit_status(view_data, internal_tx, StatusKind::Info, reason);
                return false;
            }
            view_data.mode = InputMode::Search {
                buffer: coordinator.search_text().to_owned(),
            };
        }
        NavAction::Resize(delta) => {
            let layout = coordinator.layout();
            if layout.resizable {
                let current = effective_list_percent(layout, view_data);
                let next = current
                    .saturating_add_signed(delta)
                    .clamp(MIN_LIST_PERCENT, MAX_LIST_PERCENT);
                view_data.list_percent = Some(next);
            }
        }
        NavAction::ToggleHelp => view_data.help_visible = true,
        NavAction::Command(command) => {
            if let Some(reason) = command_blocked(coordinator.ui(), &command) {
                debug!(?command, reason, "command blocked");
                emit_status(view_data, internal_tx, StatusKind::Info, reason);
                return false;
            }
            dispatch(coordinator, view_data, internal_tx, command);
        }
    }
    false
}

fn shift_index(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let max = len - 1;
    current.saturating_add_signed(delta).min(max)
}

fn effective_list_percent(layout: DetailLayout, view_data: &ViewData) -> u16 {
    if !layout.detail_visible {
        return 100;
    }
    view_data.list_percent.unwrap_or(layout.list_percent)
}

fn render<C: RecordCollection>(
    frame: &mut ratatui::Frame<'_>,
    coordinator: &Coordinator<C>,
    view_data: &ViewData,
) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let layout = coordinator.layout();
    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(layout.search_percent),
            Constraint::Percentage(100 - layout.search_percent),
        ])
        .split(outer[0]);
    let search = Paragraph::new(search_text(coordinator, view_data)).block(
        Block::default()
            .title(format!("search {}", PersonField::DISPLAY.label()))
            .borders(Borders::ALL),
    );
    frame.render_widget(search, header[0]);
    let summary = Paragraph::new(header_text(coordinator))
        .block(Block::default().title("rolodex").borders(Borders::ALL));
    frame.render_widget(summary, header[1]);

    let list_percent = effective_list_percent(layout, view_data);
    if layout.detail_visible {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(list_percent),
                Constraint::Percentage(100 - list_percent),
            ])
            .split(outer[1]);
        render_list(frame, body[0], coordinator, view_data);
        let detail = Paragraph::new(detail_lines(coordinator, view_data))
            .block(Block::default().title("detail").borders(Borders::ALL));
        frame.render_widget(detail, body[1]);
    } else {
        render_list(frame, outer[1], coordinator, view_data);
    }

    let status_style = match view_data.status.as_ref().map(|status| status.kind) {
        Some(StatusKind::Error) => Style::default().fg(Color::Red),
        Some(StatusKind::Success) => Style::default().fg(Color::Green),
        Some(StatusKind::Info) | None => Style::default().fg(Color::Yellow),
    };
    let status = Paragraph::new(status_text(coordinator.ui(), view_data))
        .style(status_style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, outer[2]);

    if let Some(dialog) = &view_data.dialog {
        let area = centered_rect(60, 30, frame.area());
        frame.render_widget(Clear, area);
        let body = Paragraph::new(format!("{}\n\nenter/esc close", dialog.text)).block(
            Block::default()
                .title("service error")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(body, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_list<C: RecordCollection>(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    coordinator: &Coordinator<C>,
    view_data: &ViewData,
) {
    let header = Row::new(PersonField::ALL.iter().map(|field| {
        Cell::from(field.label()).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let selected = coordinator.list_selection();
    let rows = coordinator
        .rows()
        .into_iter()
        .enumerate()
        .map(|(index, (context, person))| {
            let mut style = Style::default();
            if Some(context) == selected {
                style = style.add_modifier(Modifier::BOLD);
            }
            if index == view_data.cursor {
                style = style.bg(Color::DarkGray);
            }
            let cells = PersonField::ALL
                .iter()
                .map(|field| Cell::from(person.get(*field)))
                .collect::<Vec<_>>();
            Row::new(cells).style(style)
        });

    let widths = [
        Constraint::Min(12),
        Constraint::Min(10),
        Constraint::Min(10),
        Constraint::Length(5),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title("people").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn search_text<C: RecordCollection>(coordinator: &Coordinator<C>, view_data: &ViewData) -> String {
    match &view_data.mode {
        InputMode::Search { buffer } => format!("{buffer}_"),
        InputMode::Nav | InputMode::Edit { .. } => coordinator.search_text().to_owned(),
    }
}

fn header_text<C: RecordCollection>(coordinator: &Coordinator<C>) -> String {
    let sort = sort_label(coordinator.texts(), coordinator.sort());
    format!(
        "{} people | sort: {sort}",
        coordinator.collection().contexts().len()
    )
}

fn detail_lines<C: RecordCollection>(
    coordinator: &Coordinator<C>,
    view_data: &ViewData,
) -> Vec<Line<'static>> {
    let Some(person) = coordinator.detail_record() else {
        return Vec::new();
    };
    let context = coordinator.detail_context();
    PersonField::ALL
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let value = match &view_data.mode {
                InputMode::Edit {
                    context: editing,
                    field: edited,
                    buffer,
                } if Some(*editing) == context && edited == field => format!("{buffer}_"),
                _ => person.get(*field),
            };
            let line = Line::from(format!("{:>10}: {value}", field.label()));
            if index == view_data.detail_field {
                line.style(Style::default().fg(Color::Cyan))
            } else {
                line
            }
        })
        .collect()
}

fn status_text(ui: UiState, view_data: &ViewData) -> String {
    if view_data.dialog.is_some() || view_data.help_visible {
        return String::new();
    }

    let mode = view_data.mode.label();
    let hints = match &view_data.mode {
        InputMode::Nav => "j/k enter esc | n new d del | s save r reset | R refresh o sort / search | e edit tab field | ? help q quit".to_owned(),
        InputMode::Search { .. } => "type to filter | enter apply | esc cancel".to_owned(),
        InputMode::Edit { field, buffer, .. } => {
            format!("{}: {buffer}_ | enter apply | esc cancel", field.label())
        }
    };

    let mut parts = vec![mode.to_owned()];
    if ui.busy {
        parts.push("saving".to_owned());
    } else if ui.has_ui_changes {
        parts.push("unsaved".to_owned());
    }
    if let Some(status) = &view_data.status {
        parts.push(status.text.clone());
    }
    parts.push(hints);
    parts.join(" | ")
}

fn help_overlay_text() -> &'static str {
    "list: j/k move | g/G first/last | enter show detail | esc hide detail | [ ] resize\n\
detail: tab/shift+tab field | e edit field | enter apply | esc cancel\n\
changes: n new | d delete | s save | r reset\n\
data: R refresh | o sort by last name | / search last name | X restore demo data\n\
global: ? help | q or ctrl+c quit"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}
