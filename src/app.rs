//! Calendar client state and event handling.
//!
//! [`App`] owns everything the UI shows. User input arrives as [`Action`]s,
//! network completions as [`AppUpdate`]s over an mpsc channel; both are
//! applied on the UI thread.

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::api::{CalendarService, SessionInfo};
use crate::config::Config;
use crate::constants::async_tasks::CHANNEL_BUFFER_SIZE;
use crate::error::{Error, Result};
use crate::form::{DetailField, DetailForm, InfoView, LoginForm, TextField};
use crate::input::{self, Action, FieldEdit, Focus, InputContext, InputResult, Overlay};
use crate::month::{build_tiles, MonthView, Tile};
use crate::types::{DayEntry, MonthKey};

/// Messages sent back by spawned network tasks.
#[derive(Debug)]
pub enum AppUpdate {
    /// A month fetch finished, followed by the session check that always trails it.
    MonthLoaded {
        /// Sequence token the request was issued with.
        seq: u64,
        /// Month that was requested.
        month: MonthKey,
        /// Entries, or why they could not be fetched.
        days: Result<Vec<DayEntry>>,
        /// Session state reported afterwards.
        session: Result<SessionInfo>,
    },
    /// The login request completed.
    LoginFinished(Result<()>),
    /// The logout request completed.
    LogoutFinished(Result<()>),
    /// The save request for one day completed.
    SaveFinished {
        /// Date the entry was saved for.
        date: String,
        /// Outcome of the request.
        result: Result<()>,
    },
}

/// Authentication state as last reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Whether editing is offered.
    pub logged_in: bool,
    /// Signed-in editor, when the server names one.
    pub username: Option<String>,
}

impl From<SessionInfo> for SessionState {
    fn from(info: SessionInfo) -> Self {
        Self { logged_in: info.logged_in, username: info.username.filter(|_| info.logged_in) }
    }
}

/// Screen regions recorded by the last draw, used to resolve mouse clicks.
#[derive(Debug, Clone, Default)]
pub struct ScreenLayout {
    /// Grid index and area of every day tile.
    pub tiles: Vec<(usize, Rect)>,
    /// Area of the topmost overlay panel, if one is shown.
    pub overlay: Option<Rect>,
    /// "Previous month" header control.
    pub prev: Option<Rect>,
    /// "Next month" header control.
    pub next: Option<Rect>,
}

const fn rect_contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

/// Calendar client state. Constructed once at startup and mutated only
/// through [`App::dispatch`] and [`App::handle_updates`].
pub struct App {
    /// Month the user navigated to; the target of reloads.
    pub current: MonthKey,
    /// Month data behind the rendered grid.
    pub month: MonthView,
    /// Grid cells built from `month`, each day holding an entry snapshot.
    pub tiles: Vec<Tile>,
    /// Highlighted day of the month.
    pub selected_day: u32,
    /// Session state at the last check.
    pub session: SessionState,
    /// Whether the login prompt is shown.
    pub login_visible: bool,
    /// Login prompt contents.
    pub login_form: LoginForm,
    /// Day editor, when shown.
    pub detail: Option<DetailForm>,
    /// Read-only day view, when shown.
    pub info: Option<InfoView>,
    /// Blocking notice text.
    pub notice: Option<String>,
    /// Whether the key help panel is shown.
    pub show_help: bool,
    /// Regions from the last draw.
    pub layout: ScreenLayout,
    /// Loaded configuration.
    pub config: Config,
    service: Arc<dyn CalendarService>,
    async_task_tx: mpsc::Sender<AppUpdate>,
    async_task_rx: mpsc::Receiver<AppUpdate>,
    month_seq: u64,
    in_flight: usize,
    should_quit: bool,
}

impl App {
    /// Create the client showing `initial` (nothing is fetched until [`App::start`]).
    pub fn new(config: Config, service: Arc<dyn CalendarService>, initial: MonthKey) -> Self {
        let (async_task_tx, async_task_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            current: initial,
            month: MonthView::empty(initial),
            tiles: Vec::new(),
            selected_day: 1,
            session: SessionState::default(),
            login_visible: false,
            login_form: LoginForm::default(),
            detail: None,
            info: None,
            notice: None,
            show_help: false,
            layout: ScreenLayout::default(),
            config,
            service,
            async_task_tx,
            async_task_rx,
            month_seq: 0,
            in_flight: 0,
            should_quit: false,
        }
    }

    /// Kick off the initial fetch of the current month and session.
    pub fn start(&mut self) {
        self.load_month(self.current);
    }

    /// Whether the event loop should stop.
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Whether any request is outstanding.
    pub const fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// What currently receives input, topmost first.
    pub const fn focus(&self) -> Focus {
        if self.notice.is_some() {
            Focus::Notice
        } else if self.show_help {
            Focus::Help
        } else if self.login_visible {
            Focus::Login
        } else if self.detail.is_some() {
            Focus::Detail
        } else if self.info.is_some() {
            Focus::Info
        } else {
            Focus::Calendar
        }
    }

    fn input_context(&self) -> InputContext {
        InputContext {
            focus: self.focus(),
            logged_in: self.session.logged_in,
            login_field: self.login_form.focus,
            detail_field: self.detail.as_ref().map_or(DetailField::Status, |d| d.focus),
        }
    }

    /// Translate a key press into an action and apply it.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if let InputResult::Dispatch(action) = input::route(key, &self.input_context()) {
            self.dispatch(action);
        }
    }

    /// Apply pasted text to the focused field, if any.
    pub fn handle_paste(&mut self, text: String) {
        if self.focused_field().is_some() {
            self.dispatch(Action::Edit(FieldEdit::Paste(text)));
        }
    }

    /// Resolve a mouse click against the regions of the last draw.
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let (column, row) = (event.column, event.row);

        let overlay = match self.focus() {
            Focus::Notice | Focus::Help => return,
            Focus::Login => Some(Overlay::Login),
            Focus::Detail => Some(Overlay::Detail),
            Focus::Info => Some(Overlay::Info),
            Focus::Calendar => None,
        };

        if let Some(overlay) = overlay {
            // Only a click on the backdrop itself closes the panel.
            let on_panel = self.layout.overlay.is_some_and(|area| rect_contains(area, column, row));
            if !on_panel {
                self.dispatch(Action::Close(overlay));
            }
            return;
        }

        if self.layout.prev.is_some_and(|area| rect_contains(area, column, row)) {
            self.dispatch(Action::PrevMonth);
        } else if self.layout.next.is_some_and(|area| rect_contains(area, column, row)) {
            self.dispatch(Action::NextMonth);
        } else if let Some(index) = self
            .layout
            .tiles
            .iter()
            .find(|(_, area)| rect_contains(*area, column, row))
            .map(|(index, _)| *index)
        {
            self.dispatch(Action::OpenTile(index));
        }
    }

    /// The single state-update function: apply one user action.
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::PrevMonth => self.load_month(self.current.prev()),
            Action::NextMonth => self.load_month(self.current.next()),
            Action::Today => self.load_month(MonthKey::current()),
            Action::Reload => self.load_month(self.current),
            Action::MoveSelection(delta) => self.move_selection(delta),
            Action::SelectDay(day) => {
                if (1..=self.month.days_in_month).contains(&day) {
                    self.selected_day = day;
                }
            }
            Action::OpenSelected => {
                if let Some(index) = self.tile_index_of(self.selected_day) {
                    self.open_tile(index);
                }
            }
            Action::OpenTile(index) => self.open_tile(index),
            Action::ShowLogin => self.login_visible = true,
            Action::Logout => self.logout(),
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::DismissNotice => self.notice = None,
            Action::Close(Overlay::Login) => self.login_visible = false,
            Action::Close(Overlay::Detail) => self.detail = None,
            Action::Close(Overlay::Info) => self.info = None,
            Action::SubmitLogin => self.login(),
            Action::SaveDetail => self.save_detail(),
            Action::ClearDetail => {
                if let Some(form) = self.detail.as_mut() {
                    form.clear();
                }
            }
            Action::CycleStatus { forward } => {
                if let Some(form) = self.detail.as_mut() {
                    form.cycle_status(forward);
                }
            }
            Action::NextField => match self.focus() {
                Focus::Login => self.login_form.toggle_focus(),
                Focus::Detail => {
                    if let Some(form) = self.detail.as_mut() {
                        form.toggle_focus();
                    }
                }
                _ => {}
            },
            Action::Edit(edit) => {
                if let Some(field) = self.focused_field() {
                    apply_edit(field, edit);
                }
            }
        }
    }

    fn focused_field(&mut self) -> Option<&mut TextField> {
        match self.focus() {
            Focus::Login => Some(self.login_form.focused_mut()),
            Focus::Detail => self
                .detail
                .as_mut()
                .filter(|form| form.focus == DetailField::Reason)
                .map(|form| &mut form.reason),
            _ => None,
        }
    }

    fn move_selection(&mut self, delta: i32) {
        let days = i64::from(self.month.days_in_month);
        if days == 0 {
            return;
        }
        let target = (i64::from(self.selected_day) + i64::from(delta)).clamp(1, days);
        self.selected_day = u32::try_from(target).unwrap_or(1);
    }

    fn tile_index_of(&self, day: u32) -> Option<usize> {
        self.tiles.iter().position(|tile| tile.as_day().is_some_and(|t| t.day == day))
    }

    /// Open the tile's snapshot in the view matching the current session.
    fn open_tile(&mut self, index: usize) {
        let Some(tile) = self.tiles.get(index).and_then(Tile::as_day) else {
            return;
        };
        let day = tile.day;
        let entry = tile.entry.clone();
        self.selected_day = day;

        if self.session.logged_in {
            self.detail = Some(DetailForm::new(entry.date.clone(), &entry, &self.config.status_choices));
        } else {
            self.info = Some(InfoView::new(entry.date.clone(), &entry));
        }
    }

    fn spawn_task<F>(&mut self, task: F)
    where
        F: Future<Output = AppUpdate> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.async_task_tx.clone();
        tokio::spawn(async move {
            let update = task.await;
            if tx.send(update).await.is_err() {
                tracing::debug!("Update receiver dropped before task finished");
            }
        });
    }

    /// Fetch `month`, then re-check the session.
    ///
    /// Each call takes a fresh sequence token; only the response carrying the
    /// latest token is applied.
    pub fn load_month(&mut self, month: MonthKey) {
        self.current = month;
        self.month_seq += 1;
        let seq = self.month_seq;
        tracing::info!("Loading {month} (request {seq})");

        let service = Arc::clone(&self.service);
        self.spawn_task(async move {
            let days = service.fetch_month(month).await;
            let session = service.session().await;
            AppUpdate::MonthLoaded { seq, month, days, session }
        });
    }

    fn login(&mut self) {
        let credentials = self.login_form.credentials();
        tracing::info!("Logging in as {}", credentials.username);
        let service = Arc::clone(&self.service);
        self.spawn_task(async move { AppUpdate::LoginFinished(service.login(&credentials).await) });
    }

    fn logout(&mut self) {
        let service = Arc::clone(&self.service);
        self.spawn_task(async move { AppUpdate::LogoutFinished(service.logout().await) });
    }

    fn save_detail(&mut self) {
        let Some(form) = self.detail.as_ref() else {
            return;
        };
        let entry = form.to_entry();
        tracing::info!("Saving {} as {}", entry.date, entry.status);
        let service = Arc::clone(&self.service);
        self.spawn_task(async move {
            let result = service.save_entry(&entry).await;
            AppUpdate::SaveFinished { date: entry.date, result }
        });
    }

    /// Apply every update that has already arrived, without waiting.
    pub fn handle_updates(&mut self) {
        loop {
            match self.async_task_rx.try_recv() {
                Ok(update) => self.apply_update(update),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    tracing::warn!("Async update channel disconnected");
                    break;
                }
            }
        }
    }

    /// Wait until every outstanding request, including follow-up loads they
    /// trigger, has been applied.
    pub async fn wait_for_updates(&mut self) {
        while self.in_flight > 0 {
            match self.async_task_rx.recv().await {
                Some(update) => self.apply_update(update),
                None => break,
            }
        }
    }

    fn apply_update(&mut self, update: AppUpdate) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match update {
            AppUpdate::MonthLoaded { seq, month, days, session } => {
                if seq != self.month_seq {
                    tracing::debug!("Discarding stale response for {month} (request {seq}, latest {})", self.month_seq);
                    return;
                }
                match days {
                    Ok(days) => self.replace_month(month, days),
                    Err(e) => {
                        tracing::warn!("Failed to fetch {month}: {e}");
                        self.notice = Some("Failed to fetch calendar".to_string());
                    }
                }
                match session {
                    Ok(info) => self.session = info.into(),
                    Err(e) => tracing::warn!("Session check failed: {e}"),
                }
            }
            AppUpdate::LoginFinished(result) => match result {
                Ok(()) => {
                    tracing::info!("Login succeeded");
                    self.login_visible = false;
                    self.load_month(self.current);
                }
                Err(e) => {
                    tracing::warn!("Login failed: {e}");
                    self.notice = Some(login_failure_notice(&e));
                }
            },
            AppUpdate::LogoutFinished(result) => {
                if let Err(e) = result {
                    tracing::warn!("Logout request failed: {e}");
                }
                self.load_month(self.current);
            }
            AppUpdate::SaveFinished { date, result } => {
                // A reply only acts on the editor it was sent from; another
                // day's editor opened since keeps its edits.
                let other_editor = self.detail.as_ref().is_some_and(|form| form.date != date);
                match result {
                    Ok(()) => {
                        tracing::info!("Saved {date}");
                        if !other_editor {
                            self.detail = None;
                        }
                        self.load_month(self.current);
                    }
                    Err(e) if e.is_unauthorized() => {
                        tracing::warn!("Save of {date} refused, session missing");
                        if !other_editor {
                            self.detail = None;
                            self.login_visible = true;
                        }
                        self.notice = Some("You must log in to edit.".to_string());
                    }
                    Err(e) => {
                        tracing::warn!("Save of {date} failed: {e}");
                        self.notice = Some(save_failure_notice(&e));
                    }
                }
            }
        }
    }

    fn replace_month(&mut self, month: MonthKey, days: Vec<DayEntry>) {
        self.month = MonthView::from_days(month, days);
        self.tiles = build_tiles(&self.month);
        self.selected_day = self.selected_day.clamp(1, self.month.days_in_month.max(1));
        tracing::info!("Showing {month} with {} days", self.month.days_in_month);
    }
}

fn apply_edit(field: &mut TextField, edit: FieldEdit) {
    match edit {
        FieldEdit::Insert(c) => field.insert_char(c),
        FieldEdit::Paste(text) => field.insert_str(&text),
        FieldEdit::Backspace => field.delete_backward(),
        FieldEdit::Delete => field.delete_forward(),
        FieldEdit::Left => field.move_left(),
        FieldEdit::Right => field.move_right(),
        FieldEdit::Home => field.home(),
        FieldEdit::End => field.end(),
    }
}

fn login_failure_notice(err: &Error) -> String {
    if err.is_transport() {
        "Login error".to_string()
    } else {
        format!("Login failed: {}", err.server_message().unwrap_or("invalid credentials"))
    }
}

fn save_failure_notice(err: &Error) -> String {
    match err {
        Error::Rejected { status, message } => {
            format!("Save failed: {}", message.clone().unwrap_or_else(|| status.to_string()))
        }
        _ if err.is_transport() => "Save error".to_string(),
        _ => format!("Save failed: {err}"),
    }
}
