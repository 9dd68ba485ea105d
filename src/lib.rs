//! Attendance calendar - a terminal month view of daily attendance entries.
//!
//! Anonymous viewers can browse recorded statuses; a logged-in editor can
//! create, update or clear the entry for any day on the attendance server.

// Re-export public modules for use in integration tests and as a library
pub mod api;
pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod form;
pub mod input;
pub mod logging;
pub mod month;
pub mod types;
pub mod ui;
