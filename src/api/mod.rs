//! Attendance server integration.
//!
//! Provides the HTTP client for the calendar, session and attendance
//! endpoints, plus the [`CalendarService`] trait the application talks to.

/// HTTP client for the attendance server
pub mod client;
/// Wire types exchanged with the attendance server
pub mod types;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{DayEntry, MonthKey};

// Re-export key components
pub use client::AttendanceClient;
pub use types::{Credentials, SessionInfo};

/// Operations the calendar needs from the attendance server.
///
/// Implemented over HTTP by [`AttendanceClient`]; tests substitute an
/// in-memory implementation.
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Fetch every day of `month`, in date order.
    async fn fetch_month(&self, month: MonthKey) -> Result<Vec<DayEntry>>;

    /// Current authentication state.
    async fn session(&self) -> Result<SessionInfo>;

    /// Start a session. Succeeds only on HTTP 200.
    async fn login(&self, credentials: &Credentials) -> Result<()>;

    /// End the session. Any HTTP response counts as completion.
    async fn logout(&self) -> Result<()>;

    /// Create, update or clear (status `none`) the entry for `entry.date`.
    async fn save_entry(&self, entry: &DayEntry) -> Result<()>;
}
