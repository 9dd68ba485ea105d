//! Input handling abstractions.
//!
//! Keyboard events are translated into typed [`Action`]s by a handler chosen
//! from the current [`Focus`]. The application consumes those actions in a
//! single dispatch function, so handlers can be tested without an `App`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::form::{DetailField, LoginField};

/// Which modal panel an action refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// Login prompt.
    Login,
    /// Editable day view.
    Detail,
    /// Read-only day view.
    Info,
}

/// Edit applied to the focused text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    /// Type a character.
    Insert(char),
    /// Paste text.
    Paste(String),
    /// Delete before the cursor.
    Backspace,
    /// Delete at the cursor.
    Delete,
    /// Cursor left.
    Left,
    /// Cursor right.
    Right,
    /// Cursor to start.
    Home,
    /// Cursor to end.
    End,
}

/// Everything the user can ask the application to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Leave the application.
    Quit,
    /// Show the previous month.
    PrevMonth,
    /// Show the next month.
    NextMonth,
    /// Show the month containing today.
    Today,
    /// Re-fetch the displayed month.
    Reload,
    /// Move the selected day by a number of days.
    MoveSelection(i32),
    /// Select a day by its number.
    SelectDay(u32),
    /// Open the selected day.
    OpenSelected,
    /// Open the tile at a grid index.
    OpenTile(usize),
    /// Show the login prompt.
    ShowLogin,
    /// End the session.
    Logout,
    /// Show or hide the key help.
    ToggleHelp,
    /// Dismiss the blocking notice.
    DismissNotice,
    /// Hide an overlay, discarding unsaved edits.
    Close(Overlay),
    /// Submit the login form.
    SubmitLogin,
    /// Submit the day editor.
    SaveDetail,
    /// Reset the day editor to no status and no reason.
    ClearDetail,
    /// Step the day editor's status.
    CycleStatus {
        /// Step towards the end of the list.
        forward: bool,
    },
    /// Move focus to the next field of the topmost form.
    NextField,
    /// Edit the focused text field.
    Edit(FieldEdit),
}

/// Result of processing an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
    /// The input maps to an action.
    Dispatch(Action),
    /// The input was ignored (not applicable to this handler).
    Ignored,
}

/// What currently receives keyboard input, topmost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// A blocking notice is shown.
    Notice,
    /// The help panel is shown.
    Help,
    /// The login prompt is shown.
    Login,
    /// The day editor is shown.
    Detail,
    /// The read-only day view is shown.
    Info,
    /// No overlay; the month grid has focus.
    Calendar,
}

/// Context passed to input handlers.
///
/// This provides handlers with the information they need to process
/// input without directly accessing the full App state.
#[derive(Debug, Clone, Copy)]
pub struct InputContext {
    /// What receives input.
    pub focus: Focus,
    /// Session state at the last check.
    pub logged_in: bool,
    /// Focused login field.
    pub login_field: LoginField,
    /// Focused day editor control.
    pub detail_field: DetailField,
}

/// Trait for handling keyboard input.
///
/// Implementations of this trait handle input for specific modes
/// or input contexts.
pub trait InputHandler {
    /// Handle a key event.
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext) -> InputResult;

    /// Get the name of this handler (for debugging).
    fn name(&self) -> &'static str;
}

/// Route `key` to the handler for the current focus.
pub fn route(key: KeyEvent, ctx: &InputContext) -> InputResult {
    let result = match ctx.focus {
        Focus::Notice => NoticeHandler.handle(key, ctx),
        Focus::Help => HelpHandler.handle(key, ctx),
        Focus::Login => LoginHandler.handle(key, ctx),
        Focus::Detail => DetailHandler.handle(key, ctx),
        Focus::Info => InfoHandler.handle(key, ctx),
        Focus::Calendar => CalendarHandler.handle(key, ctx),
    };
    if result == InputResult::Ignored && is_ctrl_c(key) {
        return InputResult::Dispatch(Action::Quit);
    }
    result
}

fn is_ctrl_c(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

fn dispatch(action: Action) -> InputResult {
    InputResult::Dispatch(action)
}

/// Map text-editing keys shared by every text field.
fn field_edit(key: KeyEvent) -> InputResult {
    let edit = match key.code {
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            FieldEdit::Insert(c)
        }
        KeyCode::Backspace => FieldEdit::Backspace,
        KeyCode::Delete => FieldEdit::Delete,
        KeyCode::Left => FieldEdit::Left,
        KeyCode::Right => FieldEdit::Right,
        KeyCode::Home => FieldEdit::Home,
        KeyCode::End => FieldEdit::End,
        _ => return InputResult::Ignored,
    };
    dispatch(Action::Edit(edit))
}

/// Handler for the month grid.
#[derive(Debug, Default)]
pub struct CalendarHandler;

impl InputHandler for CalendarHandler {
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext) -> InputResult {
        let action = match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Left | KeyCode::Char('h') => Action::MoveSelection(-1),
            KeyCode::Right | KeyCode::Char('l') => Action::MoveSelection(1),
            KeyCode::Up | KeyCode::Char('k') => Action::MoveSelection(-7),
            KeyCode::Down | KeyCode::Char('j') => Action::MoveSelection(7),
            KeyCode::Enter | KeyCode::Char(' ') => Action::OpenSelected,
            KeyCode::PageUp | KeyCode::Char('[' | 'p') => Action::PrevMonth,
            KeyCode::PageDown | KeyCode::Char(']' | 'n') => Action::NextMonth,
            KeyCode::Char('t') => Action::Today,
            KeyCode::Char('r') => Action::Reload,
            KeyCode::Char('L') if !ctx.logged_in => Action::ShowLogin,
            KeyCode::Char('O') if ctx.logged_in => Action::Logout,
            KeyCode::F(1) | KeyCode::Char('?') => Action::ToggleHelp,
            _ => return InputResult::Ignored,
        };
        dispatch(action)
    }

    fn name(&self) -> &'static str {
        "CalendarHandler"
    }
}

/// Handler for the login prompt.
#[derive(Debug, Default)]
pub struct LoginHandler;

impl InputHandler for LoginHandler {
    fn handle(&mut self, key: KeyEvent, _ctx: &InputContext) -> InputResult {
        match key.code {
            KeyCode::Esc => dispatch(Action::Close(Overlay::Login)),
            KeyCode::Enter => dispatch(Action::SubmitLogin),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => dispatch(Action::NextField),
            _ => field_edit(key),
        }
    }

    fn name(&self) -> &'static str {
        "LoginHandler"
    }
}

/// Handler for the day editor.
#[derive(Debug, Default)]
pub struct DetailHandler;

impl InputHandler for DetailHandler {
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext) -> InputResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return dispatch(Action::Close(Overlay::Detail)),
            KeyCode::Enter => return dispatch(Action::SaveDetail),
            KeyCode::Char('s') if ctrl => return dispatch(Action::SaveDetail),
            KeyCode::Char('x') if ctrl => return dispatch(Action::ClearDetail),
            KeyCode::Tab | KeyCode::BackTab => return dispatch(Action::NextField),
            _ => {}
        }

        match ctx.detail_field {
            DetailField::Status => match key.code {
                KeyCode::Left | KeyCode::Up | KeyCode::Char('h' | 'k') => {
                    dispatch(Action::CycleStatus { forward: false })
                }
                KeyCode::Right | KeyCode::Down | KeyCode::Char('l' | 'j' | ' ') => {
                    dispatch(Action::CycleStatus { forward: true })
                }
                KeyCode::Char('x') => dispatch(Action::ClearDetail),
                _ => InputResult::Ignored,
            },
            DetailField::Reason => field_edit(key),
        }
    }

    fn name(&self) -> &'static str {
        "DetailHandler"
    }
}

/// Handler for the read-only day view.
#[derive(Debug, Default)]
pub struct InfoHandler;

impl InputHandler for InfoHandler {
    fn handle(&mut self, key: KeyEvent, _ctx: &InputContext) -> InputResult {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => dispatch(Action::Close(Overlay::Info)),
            _ => InputResult::Ignored,
        }
    }

    fn name(&self) -> &'static str {
        "InfoHandler"
    }
}

/// Handler for the help panel.
#[derive(Debug, Default)]
pub struct HelpHandler;

impl InputHandler for HelpHandler {
    fn handle(&mut self, key: KeyEvent, _ctx: &InputContext) -> InputResult {
        match key.code {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') => dispatch(Action::ToggleHelp),
            _ => InputResult::Ignored,
        }
    }

    fn name(&self) -> &'static str {
        "HelpHandler"
    }
}

/// Handler for a blocking notice; everything but dismissal is swallowed.
#[derive(Debug, Default)]
pub struct NoticeHandler;

impl InputHandler for NoticeHandler {
    fn handle(&mut self, key: KeyEvent, _ctx: &InputContext) -> InputResult {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => dispatch(Action::DismissNotice),
            _ => InputResult::Ignored,
        }
    }

    fn name(&self) -> &'static str {
        "NoticeHandler"
    }
}
