//! Overlay form state.
//!
//! Single-line text fields plus the login, day-editor and read-only views
//! shown over the calendar. Kept free of UI types so the editing logic can be
//! tested on its own.

use crate::api::Credentials;
use crate::types::{DayEntry, Status};

/// Single-line editable text with a character cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    /// Cursor position counted in chars.
    cursor: usize,
}

impl TextField {
    /// A field holding `value` with the cursor at the end.
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    /// Current text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in chars.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value.char_indices().nth(char_idx).map_or(self.value.len(), |(i, _)| i)
    }

    /// Insert a character at the cursor.
    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Insert a string at the cursor (pasted text; newlines are dropped).
    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars().filter(|c| !c.is_control()) {
            self.insert_char(c);
        }
    }

    /// Delete the character before the cursor (backspace).
    pub fn delete_backward(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
    }

    /// Delete the character at the cursor (delete).
    pub fn delete_forward(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// Move the cursor one char left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor one char right.
    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    /// Move the cursor to the start.
    pub fn home(&mut self) {
        self.cursor = 0;
    }

    /// Move the cursor to the end.
    pub fn end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Remove all text.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}

/// Field focus within the login form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginField {
    /// User name input.
    #[default]
    Username,
    /// Password input.
    Password,
}

/// Login prompt contents.
///
/// Values survive the overlay being hidden; nothing clears the password.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    /// User name input.
    pub username: TextField,
    /// Password input, drawn masked.
    pub password: TextField,
    /// Focused input.
    pub focus: LoginField,
}

impl LoginForm {
    /// The focused text field.
    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    /// Move focus to the other field.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    /// Credentials to submit; the user name is trimmed, the password is not.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.value().trim().to_string(),
            password: self.password.value().to_string(),
        }
    }

    /// Password rendered as bullets.
    pub fn masked_password(&self) -> String {
        "•".repeat(self.password.value().chars().count())
    }
}

/// Field focus within the day editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetailField {
    /// Status selector.
    #[default]
    Status,
    /// Reason input.
    Reason,
}

/// Editable view of one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailForm {
    /// ISO date being edited.
    pub date: String,
    choices: Vec<Status>,
    selected: usize,
    /// Reason input.
    pub reason: TextField,
    /// Focused control.
    pub focus: DetailField,
}

impl DetailForm {
    /// Open the editor pre-populated from `entry`.
    ///
    /// A status missing from `choices` is appended so it can be kept as is.
    pub fn new(date: impl Into<String>, entry: &DayEntry, choices: &[Status]) -> Self {
        let mut choices = choices.to_vec();
        if !choices.iter().any(Status::is_none) {
            choices.insert(0, Status::none());
        }
        let current = if entry.status.as_str().is_empty() { Status::none() } else { entry.status.clone() };
        let selected = choices.iter().position(|s| *s == current).unwrap_or_else(|| {
            choices.push(current);
            choices.len() - 1
        });
        Self {
            date: date.into(),
            choices,
            selected,
            reason: TextField::with_value(entry.reason.clone()),
            focus: DetailField::Status,
        }
    }

    /// Currently selected status.
    pub fn status(&self) -> &Status {
        &self.choices[self.selected]
    }

    /// Step the status selection, wrapping at either end.
    pub fn cycle_status(&mut self, forward: bool) {
        let n = self.choices.len();
        self.selected = if forward { (self.selected + 1) % n } else { (self.selected + n - 1) % n };
    }

    /// Move focus to the other control.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            DetailField::Status => DetailField::Reason,
            DetailField::Reason => DetailField::Status,
        };
    }

    /// Reset to `none` with an empty reason. Nothing is sent until saved.
    pub fn clear(&mut self) {
        self.selected = self.choices.iter().position(Status::is_none).unwrap_or(0);
        self.reason.clear();
    }

    /// The entry to submit, with the reason trimmed.
    pub fn to_entry(&self) -> DayEntry {
        DayEntry {
            date: self.date.clone(),
            status: self.status().clone(),
            reason: self.reason.value().trim().to_string(),
        }
    }
}

/// Read-only view of one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoView {
    /// ISO date shown.
    pub date: String,
    /// Human-readable status label.
    pub status_label: String,
    /// Reason text or the em-dash placeholder.
    pub reason: String,
}

impl InfoView {
    /// Describe `entry` for display.
    pub fn new(date: impl Into<String>, entry: &DayEntry) -> Self {
        Self {
            date: date.into(),
            status_label: entry.status.label(),
            reason: entry.reason_or_placeholder().to_string(),
        }
    }
}
