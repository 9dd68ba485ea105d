//! Month data and grid layout.
//!
//! [`MonthView`] holds the entries fetched for one month; [`build_tiles`]
//! turns it into the week-aligned grid the UI draws.

use std::collections::HashMap;

use crate::types::{DayEntry, MonthKey};

/// Entries for the displayed month, replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    /// The month the entries belong to.
    pub key: MonthKey,
    /// Number of days the server returned for the month.
    pub days_in_month: u32,
    entries_by_date: HashMap<String, DayEntry>,
}

impl MonthView {
    /// An empty view, shown before the first fetch completes.
    pub fn empty(key: MonthKey) -> Self {
        Self { key, days_in_month: 0, entries_by_date: HashMap::new() }
    }

    /// Build a view from a server response.
    ///
    /// Entries dated outside `key` are dropped and not counted.
    pub fn from_days(key: MonthKey, days: Vec<DayEntry>) -> Self {
        let mut entries_by_date = HashMap::with_capacity(days.len());
        for day in days {
            if key.contains(&day.date) {
                entries_by_date.insert(day.date.clone(), day);
            } else {
                tracing::warn!("Dropping entry {} outside {key}", day.date);
            }
        }
        let days_in_month = u32::try_from(entries_by_date.len()).unwrap_or(u32::MAX);
        Self { key, days_in_month, entries_by_date }
    }

    /// Recorded entry for `date`, if the server returned one.
    pub fn entry(&self, date: &str) -> Option<&DayEntry> {
        self.entries_by_date.get(date)
    }

    /// Entry for `day` of the month, defaulting to an empty `none` entry.
    pub fn entry_for_day(&self, day: u32) -> DayEntry {
        let date = self.key.iso_date(day);
        self.entry(&date).cloned().unwrap_or_else(|| DayEntry::empty(date))
    }
}

/// A day tile with the entry captured when the grid was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTile {
    /// Day of the month, 1-based.
    pub day: u32,
    /// Whether the day falls on a Sunday.
    pub is_sunday: bool,
    /// Snapshot of the day's entry.
    pub entry: DayEntry,
}

impl DayTile {
    /// Short reason label, present only for days with a status and a reason.
    pub fn reason_pill(&self) -> Option<&str> {
        (self.entry.has_status() && !self.entry.reason.is_empty()).then_some(self.entry.reason.as_str())
    }
}

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tile {
    /// Leading placeholder before day 1.
    Blank,
    /// A calendar day.
    Day(DayTile),
}

impl Tile {
    /// The day tile, if this is not a blank.
    pub const fn as_day(&self) -> Option<&DayTile> {
        match self {
            Self::Day(tile) => Some(tile),
            Self::Blank => None,
        }
    }
}

/// Lay out `view` as a 7-column grid starting on Sunday.
///
/// Produces one blank per weekday before day 1, then one tile per day.
pub fn build_tiles(view: &MonthView) -> Vec<Tile> {
    let blanks = view.key.leading_blanks();
    let mut tiles = Vec::with_capacity((blanks + view.days_in_month) as usize);
    tiles.extend((0..blanks).map(|_| Tile::Blank));
    tiles.extend((1..=view.days_in_month).map(|day| {
        Tile::Day(DayTile {
            day,
            is_sunday: view.key.weekday_of(day) == Some(0),
            entry: view.entry_for_day(day),
        })
    }));
    tiles
}
