// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! A ratatui + crossterm shell over the shared [`RegenerationController`]: a file panel, the
//! six-group palette editor, the Mermaid output and a footer with key help and toasts.
//!
//! [`RegenerationController`]: crate::session::RegenerationController

use std::{
    error::Error,
    io,
    path::PathBuf,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::clipboard::{Clipboard, ClipboardExporter, Osc52Clipboard};
use crate::ingest::{has_canvas_extension, ingest, CanvasFile, IngestError, PathFile};
use crate::model::{CanvasDocument, ColorGroupId, ColorPalette, CommitResult, HexColor};
use crate::session::{GenerationState, IngestOutcome, IngestTicket, SessionError, SharedController};
use crate::share::live_editor_url;

const FOCUS_COLOR: Color = Color::LightGreen;
const STALE_COLOR: Color = Color::Yellow;
const ERROR_COLOR: Color = Color::LightRed;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_BRAND_COLOR: Color = Color::White;
const FOOTER_BRAND: &str = "canvasmaid";
const PALETTE_PANEL_WIDTH: u16 = 30;
const MAX_HEX_LEN: usize = 7;
const NUDGE_STEP: f32 = 0.05;

type IngestReport = (IngestTicket, Result<CanvasDocument, IngestError>);

/// Runs the interactive terminal UI until the user quits.
///
/// Must be called outside the tokio runtime behind `runtime`: file reads are spawned on it and
/// clipboard writes block on it.
pub fn run(
    controller: SharedController,
    runtime: Handle,
    initial_file: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(controller, runtime, Osc52Clipboard);
    if let Some(path) = initial_file {
        app.open_path(path);
    }

    while !app.should_quit {
        app.drain_ingests();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
    }

    Ok(())
}

fn draw<C: Clipboard>(frame: &mut Frame<'_>, app: &mut App<C>) {
    let view = app.snapshot();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(frame.area());
    let (file_area, main_area, status_area) = (rows[0], rows[1], rows[2]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(PALETTE_PANEL_WIDTH), Constraint::Min(20)])
        .split(main_area);
    let (palette_area, output_area) = (columns[0], columns[1]);

    match &app.input {
        InputMode::OpenPath { buffer } => {
            let prompt = Paragraph::new(buffer.clone()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(FOCUS_COLOR))
                    .title(view_title("Open", 'o', Some("path to a .canvas file, Enter/Esc"))),
            );
            frame.render_widget(prompt, file_area);
            let cursor_x = file_area
                .x
                .saturating_add(1)
                .saturating_add(buffer.chars().count() as u16)
                .min(file_area.x.saturating_add(file_area.width.saturating_sub(2)));
            frame.set_cursor_position((cursor_x, file_area.y.saturating_add(1)));
        }
        InputMode::Normal | InputMode::EditColor => {
            let file = Paragraph::new(file_line(&view, app.pending_ingests > 0))
                .block(Block::default().borders(Borders::ALL).title(view_title("File", 'o', None)));
            frame.render_widget(file, file_area);
        }
    }

    let editing = app.input == InputMode::EditColor;
    let palette = Paragraph::new(palette_lines(&view.palette, app.selected_group, editing)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(if editing { Style::default().fg(FOCUS_COLOR) } else { Style::default() })
            .title(view_title("Palette", 'e', None)),
    );
    frame.render_widget(palette, palette_area);

    let output = Paragraph::new(output_text(&view))
        .scroll((app.output_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(output_border_style(view.state))
                .title(view_title("Mermaid", 'r', Some(view.state.as_str()))),
        );
    frame.render_widget(output, output_area);

    let toast_snapshot = app.toast.as_ref().map(|toast| (toast.message.clone(), toast.expires_at));
    let toast_suffix = match toast_snapshot {
        Some((message, expires_at)) if expires_at > Instant::now() => format!(" | {message}"),
        Some(_) => {
            app.toast = None;
            String::new()
        }
        None => String::new(),
    };
    let status =
        Paragraph::new(footer_help_line(app, &toast_suffix, app.exporter.is_acknowledged()));
    frame.render_widget(status, status_area);
    let brand = Paragraph::new(footer_brand_line()).alignment(Alignment::Right);
    frame.render_widget(brand, status_area);

    if app.show_help {
        render_help(frame, main_area);
    }
}

// Extracted panel/footer/help rendering helpers.
include!("chrome.rs");

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum InputMode {
    Normal,
    OpenPath { buffer: String },
    /// Editing the selected group; the palette draft is the edit buffer.
    EditColor,
}

/// Copy of the controller state needed for one frame, taken without holding the lock while
/// rendering.
#[derive(Debug, Clone)]
struct ViewSnapshot {
    state: GenerationState,
    file_name: Option<String>,
    last_error: Option<String>,
    diagram: Option<String>,
    palette: ColorPalette,
}

struct App<C> {
    controller: SharedController,
    runtime: Handle,
    exporter: ClipboardExporter<C>,
    ingest_tx: mpsc::UnboundedSender<IngestReport>,
    ingest_rx: mpsc::UnboundedReceiver<IngestReport>,
    pending_ingests: usize,
    selected_group: ColorGroupId,
    input: InputMode,
    toast: Option<Toast>,
    show_help: bool,
    output_scroll: u16,
    should_quit: bool,
}

impl<C: Clipboard> App<C> {
    fn new(controller: SharedController, runtime: Handle, clipboard: C) -> Self {
        let (ingest_tx, ingest_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            runtime,
            exporter: ClipboardExporter::new(clipboard),
            ingest_tx,
            ingest_rx,
            pending_ingests: 0,
            selected_group: ColorGroupId::FIRST,
            input: InputMode::Normal,
            toast: None,
            show_help: false,
            output_scroll: 0,
            should_quit: false,
        }
    }

    fn snapshot(&self) -> ViewSnapshot {
        let controller = self.controller.blocking_lock();
        ViewSnapshot {
            state: controller.state(),
            file_name: controller.file_name().map(str::to_owned),
            last_error: controller.last_error().map(ToString::to_string),
            diagram: controller.diagram().map(|diagram| diagram.as_str().to_owned()),
            palette: controller.palette().clone(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    /// Returns `true` when the key asks to quit.
    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        if self.show_help {
            match code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => return true,
                _ => {}
            }
            return false;
        }

        match &mut self.input {
            InputMode::OpenPath { buffer } => {
                match code {
                    KeyCode::Char(ch) => buffer.push(ch),
                    KeyCode::Backspace => {
                        buffer.pop();
                    }
                    KeyCode::Enter => {
                        let path = std::mem::take(buffer);
                        self.input = InputMode::Normal;
                        if path.trim().is_empty() {
                            self.set_toast("No path entered");
                        } else {
                            self.open_path(path.trim());
                        }
                    }
                    KeyCode::Esc => self.input = InputMode::Normal,
                    _ => {}
                }
                return false;
            }
            InputMode::EditColor => {
                self.handle_edit_key(code);
                return false;
            }
            InputMode::Normal => {}
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('o') => self.input = InputMode::OpenPath { buffer: String::new() },
            KeyCode::Char(ch @ '1'..='6') => {
                if let Some(group) = ch.to_digit(10).and_then(|d| ColorGroupId::new(d as u8).ok())
                {
                    self.selected_group = group;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.select_group_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.select_group_by(1),
            KeyCode::Char('e') | KeyCode::Enter => self.begin_edit(),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.begin_edit();
                self.nudge_selected(NUDGE_STEP);
            }
            KeyCode::Char('-') => {
                self.begin_edit();
                self.nudge_selected(-NUDGE_STEP);
            }
            KeyCode::Char('r') => self.regenerate(),
            KeyCode::Char('x') => self.remove_file(),
            KeyCode::Char('c') | KeyCode::Char('y') => self.copy_diagram(),
            KeyCode::Char('l') => self.copy_live_link(),
            KeyCode::PageDown => self.output_scroll = self.output_scroll.saturating_add(10),
            KeyCode::PageUp => self.output_scroll = self.output_scroll.saturating_sub(10),
            KeyCode::Home => self.output_scroll = 0,
            KeyCode::Esc => self.toast = None,
            _ => {}
        }
        false
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        let group = self.selected_group;
        match code {
            KeyCode::Enter => {
                self.input = InputMode::Normal;
                self.commit_selected();
            }
            KeyCode::Esc => {
                self.input = InputMode::Normal;
                self.controller.blocking_lock().revert_draft(group);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.nudge_selected(NUDGE_STEP),
            KeyCode::Char('-') => self.nudge_selected(-NUDGE_STEP),
            KeyCode::Backspace => {
                let mut controller = self.controller.blocking_lock();
                let mut draft = controller.palette().display_color(group).to_owned();
                draft.pop();
                controller.set_color(group, draft);
            }
            KeyCode::Char(ch) if ch == '#' || ch.is_ascii_hexdigit() => {
                let mut controller = self.controller.blocking_lock();
                let mut draft = controller.palette().display_color(group).to_owned();
                if draft.len() < MAX_HEX_LEN {
                    draft.push(ch);
                    controller.set_color(group, draft);
                }
            }
            _ => {}
        }
    }

    fn select_group_by(&mut self, delta: i8) {
        let groups: Vec<ColorGroupId> = ColorGroupId::all().collect();
        let current = groups.iter().position(|group| *group == self.selected_group).unwrap_or(0);
        let next = (current as i32 + i32::from(delta)).rem_euclid(groups.len() as i32) as usize;
        self.selected_group = groups[next];
    }

    /// Starts editing the selected group with its current value as the draft.
    fn begin_edit(&mut self) {
        if self.input == InputMode::EditColor {
            return;
        }
        let group = self.selected_group;
        let mut controller = self.controller.blocking_lock();
        let current = controller.palette().display_color(group).to_owned();
        controller.set_color(group, current);
        drop(controller);
        self.input = InputMode::EditColor;
    }

    fn nudge_selected(&mut self, amount: f32) {
        let group = self.selected_group;
        let mut controller = self.controller.blocking_lock();
        let palette = controller.palette();
        let base = HexColor::parse(palette.display_color(group))
            .unwrap_or_else(|_| palette.committed(group).clone());
        controller.set_color(group, base.shade(amount).to_string());
    }

    fn commit_selected(&mut self) {
        let group = self.selected_group;
        let mut controller = self.controller.blocking_lock();
        let Some(result) = controller.commit_draft(group) else {
            return;
        };
        let committed = controller.palette().committed(group).clone();
        let stale = controller.state() == GenerationState::Stale;
        drop(controller);

        match result {
            CommitResult::Accepted { changed: true } if stale => {
                self.set_toast(format!("Group {group} = {committed} (press r to regenerate)"));
            }
            CommitResult::Accepted { changed: true } => {
                self.set_toast(format!("Group {group} = {committed}"));
            }
            CommitResult::Accepted { changed: false } => {
                self.set_toast(format!("Group {group} unchanged"));
            }
            CommitResult::Rejected => {
                self.set_toast(format!("Invalid color, group {group} kept {committed}"));
            }
        }
    }

    /// Starts an async read of `path`; the result is applied by [`Self::drain_ingests`].
    fn open_path(&mut self, path: impl Into<PathBuf>) {
        let file = PathFile::new(path);
        let mut controller = self.controller.blocking_lock();
        if !has_canvas_extension(file.name()) {
            let err = IngestError::InvalidExtension { file_name: file.name().to_owned() };
            let err = controller.reject_ingest(err);
            drop(controller);
            self.set_toast(err.to_string());
            return;
        }
        let ticket = controller.begin_ingest();
        drop(controller);

        self.pending_ingests += 1;
        let tx = self.ingest_tx.clone();
        self.runtime.spawn(async move {
            let result = ingest(&file).await;
            let _ = tx.send((ticket, result));
        });
    }

    fn drain_ingests(&mut self) {
        while let Ok(report) = self.ingest_rx.try_recv() {
            self.apply_ingest(report);
        }
    }

    fn apply_ingest(&mut self, (ticket, result): IngestReport) {
        self.pending_ingests = self.pending_ingests.saturating_sub(1);
        let mut controller = self.controller.blocking_lock();
        let outcome = controller.finish_ingest(ticket, result);
        let file_name = controller.file_name().map(str::to_owned);
        drop(controller);

        match outcome {
            Ok(IngestOutcome::Applied) => {
                self.output_scroll = 0;
                self.set_toast(format!("Loaded {}", file_name.unwrap_or_default()));
            }
            Ok(IngestOutcome::Superseded) => {}
            Err(err) => self.set_toast(err.to_string()),
        }
    }

    fn regenerate(&mut self) {
        let result = self.controller.blocking_lock().regenerate().map(|_| ());
        match result {
            Ok(()) => self.set_toast("Regenerated"),
            Err(SessionError::NoDocument) => self.set_toast("Open a .canvas file first (o)"),
            Err(err) => self.set_toast(err.to_string()),
        }
    }

    fn remove_file(&mut self) {
        let mut controller = self.controller.blocking_lock();
        let file_name = controller.file_name().map(str::to_owned);
        if file_name.is_some() {
            controller.remove_document();
        }
        drop(controller);

        match file_name {
            Some(file_name) => {
                self.output_scroll = 0;
                self.set_toast(format!("Removed {file_name}"));
            }
            None => self.set_toast("No file loaded"),
        }
    }

    fn copy_diagram(&mut self) {
        let text = self
            .controller
            .blocking_lock()
            .diagram()
            .map(|diagram| diagram.as_str().to_owned())
            .unwrap_or_default();
        self.copy_text(&text, "Copied Mermaid");
    }

    /// Only an up-to-date diagram is shared.
    fn copy_live_link(&mut self) {
        let controller = self.controller.blocking_lock();
        let link = match (controller.state(), controller.diagram()) {
            (GenerationState::Generated, Some(diagram)) => Ok(live_editor_url(diagram.as_str())),
            (GenerationState::Stale, _) => Err("Diagram is stale, press r first"),
            _ => Err("Nothing to share yet"),
        };
        drop(controller);

        match link {
            Ok(link) => self.copy_text(&link, "Copied Mermaid Live link"),
            Err(message) => self.set_toast(message),
        }
    }

    fn copy_text(&mut self, text: &str, success: &str) {
        let result = self.runtime.block_on(self.exporter.copy(text));
        match result {
            Ok(()) => {
                let backend = self.exporter.clipboard().backend();
                self.set_toast(format!("{success} ({backend})"));
            }
            Err(err) => self.set_toast(format!("Clipboard error: {err}")),
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(2),
        });
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}
