//! Core type definitions for compile-time safety.
//!
//! Attendance entries, status tags and the month arithmetic used for
//! navigation live here so the UI and the HTTP layer agree on one vocabulary.

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::constants::status;

/// Regex matching the first character of every word, with ASCII word rules.
#[allow(clippy::expect_used)]
static RE_WORD_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)[0-9A-Za-z_]").expect("valid regex: RE_WORD_START")
});

/// Attendance status tag as sent by the server (`none`, `present`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(String);

impl Status {
    /// Wrap a raw status tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The `none` status, meaning no entry is recorded.
    pub fn none() -> Self {
        Self(status::NONE.to_string())
    }

    /// Whether this is the `none` status (an empty tag counts as `none`).
    pub fn is_none(&self) -> bool {
        self.0.is_empty() || self.0 == status::NONE
    }

    /// Raw tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable label, e.g. `half_day` becomes `Half Day`.
    pub fn label(&self) -> String {
        if self.is_none() {
            return status::NO_STATUS_LABEL.to_string();
        }
        capitalize_words(&self.0)
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Replace underscores with spaces and uppercase the first letter of each word.
pub fn capitalize_words(s: &str) -> String {
    let spaced = s.replace('_', " ");
    RE_WORD_START
        .replace_all(&spaced, |caps: &regex::Captures<'_>| caps[0].to_uppercase())
        .into_owned()
}

/// One calendar day's recorded state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    /// Recorded status; `none` when nothing is recorded.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: Status,
    /// Free-text reason, empty when absent.
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
}

impl DayEntry {
    /// An entry with nothing recorded.
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            status: Status::none(),
            reason: String::new(),
        }
    }

    /// Whether a status other than `none` is recorded.
    pub fn has_status(&self) -> bool {
        !self.status.is_none()
    }

    /// Reason text, or the em-dash placeholder when there is none.
    pub fn reason_or_placeholder(&self) -> &str {
        if self.reason.is_empty() {
            status::EMPTY_REASON
        } else {
            &self.reason
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A displayed month. `month` is always in `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthKey {
    /// Calendar year.
    pub year: i32,
    /// Month of the year, 1-based.
    pub month: u32,
}

impl MonthKey {
    /// Build a key, wrapping an out-of-range month into the neighbouring year.
    pub const fn new(year: i32, month: u32) -> Self {
        match month {
            0 => Self { year: year - 1, month: 12 },
            13.. => Self { year: year + 1, month: 1 },
            _ => Self { year, month },
        }
    }

    /// The month containing today's local date.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self::new(today.year(), today.month())
    }

    /// The following month; December wraps to January of the next year.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::new(self.year, self.month + 1)
    }

    /// The preceding month; January wraps to December of the previous year.
    #[must_use]
    pub const fn prev(self) -> Self {
        Self::new(self.year, self.month.saturating_sub(1))
    }

    /// First day of the month, if the year is representable.
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Weekday index of day 1, Sunday = 0 through Saturday = 6.
    pub fn leading_blanks(self) -> u32 {
        self.first_day().map_or(0, |d| d.weekday().num_days_from_sunday())
    }

    /// Weekday index (Sunday = 0) of `day` in this month.
    pub fn weekday_of(self, day: u32) -> Option<u32> {
        NaiveDate::from_ymd_opt(self.year, self.month, day).map(|d| d.weekday().num_days_from_sunday())
    }

    /// ISO date string for `day` in this month.
    pub fn iso_date(self, day: u32) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, day)
    }

    /// Display label such as `June 2024`.
    pub fn label(self) -> String {
        self.first_day()
            .map_or_else(|| format!("{}-{:02}", self.year, self.month), |d| d.format("%B %Y").to_string())
    }

    /// Whether `date` (ISO) falls inside this month.
    pub fn contains(self, date: &str) -> bool {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .is_ok_and(|d| d.year() == self.year && d.month() == self.month)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
