//! Application constants.
//!
//! Centralizes magic numbers and configuration values for better maintainability.

/// Attendance status tags.
pub mod status {
    /// Tag meaning "no entry recorded".
    pub const NONE: &str = "none";

    /// Status choices offered by the editor when none are configured.
    pub const DEFAULT_CHOICES: &[&str] = &["none", "present", "absent", "exam", "leave"];

    /// Placeholder shown in the read-only view when a day has no reason.
    pub const EMPTY_REASON: &str = "—";

    /// Label shown for a day without a recorded status.
    pub const NO_STATUS_LABEL: &str = "No status";
}

/// Attendance server connection defaults.
pub mod server {
    /// Server origin used when `ATTENDANCE_URL` is not set.
    pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

    /// Request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
}

/// Async task constants.
pub mod async_tasks {
    /// Channel buffer size for async task communication.
    pub const CHANNEL_BUFFER_SIZE: usize = 64;
}

/// UI layout constants.
pub mod ui {
    /// Columns in the month grid (one per weekday).
    pub const GRID_COLUMNS: u16 = 7;

    /// Maximum rows a month can need (6 weeks).
    pub const GRID_ROWS: u16 = 6;

    /// Width of the login overlay.
    pub const LOGIN_WIDTH: u16 = 44;

    /// Width of the detail/info overlays.
    pub const DETAIL_WIDTH: u16 = 52;

    /// Weekday header labels, Sunday first.
    pub const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
}
