//! Attendance server data types.
//!
//! These types represent the JSON bodies exchanged with the server.

use serde::{Deserialize, Serialize};

use crate::types::DayEntry;

/// Body of `GET /api/calendar`.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarResponse {
    /// Whether the server could produce the month.
    #[serde(default)]
    pub ok: bool,
    /// One entry per day of the month, in order.
    #[serde(default)]
    pub days: Vec<DayEntry>,
    /// Failure description when `ok` is false.
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `GET /api/session`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SessionInfo {
    /// Whether the cookie jar carries an authenticated session.
    #[serde(default)]
    pub logged_in: bool,
    /// Name of the signed-in editor, if any.
    #[serde(default)]
    pub username: Option<String>,
}

/// Body of `POST /api/login`.
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// Editor user name, already trimmed.
    pub username: String,
    /// Password, sent as typed.
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Optional `{message}` carried by failure responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageBody {
    /// Human-readable failure description.
    #[serde(default)]
    pub message: Option<String>,
}
