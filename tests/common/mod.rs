//! In-memory attendance server shared by the integration tests.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use async_trait::async_trait;
use attendance_tui::api::{CalendarService, Credentials, SessionInfo};
use attendance_tui::app::App;
use attendance_tui::config::Config;
use attendance_tui::error::{Error, Result};
use attendance_tui::types::{DayEntry, MonthKey, Status};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
pub struct FakeState {
    pub entries: HashMap<String, DayEntry>,
    pub logged_in: bool,
    pub fail_fetch: bool,
    pub save_error: Option<(u16, Option<String>)>,
    pub delays: HashMap<MonthKey, Duration>,
    pub fetches: Vec<MonthKey>,
    pub saves: Vec<DayEntry>,
    pub logouts: usize,
}

/// Behaves like the attendance server: one entry per day, `none` when unset.
#[derive(Default)]
pub struct FakeServer {
    pub state: Mutex<FakeState>,
}

impl FakeServer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_logged_in(&self, logged_in: bool) {
        self.state.lock().unwrap().logged_in = logged_in;
    }

    pub fn record(&self, date: &str, status: &str, reason: &str) {
        self.state.lock().unwrap().entries.insert(
            date.to_string(),
            DayEntry { date: date.to_string(), status: Status::new(status), reason: reason.to_string() },
        );
    }

    pub fn fetches(&self) -> Vec<MonthKey> {
        self.state.lock().unwrap().fetches.clone()
    }

    pub fn saves(&self) -> Vec<DayEntry> {
        self.state.lock().unwrap().saves.clone()
    }
}

fn days_of(month: MonthKey) -> Vec<String> {
    let mut days = Vec::new();
    let mut date = month.first_day().unwrap();
    while date.month() == month.month {
        days.push(date.format("%Y-%m-%d").to_string());
        date = date.succ_opt().unwrap();
    }
    days
}

#[async_trait]
impl CalendarService for FakeServer {
    async fn fetch_month(&self, month: MonthKey) -> Result<Vec<DayEntry>> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.fetches.push(month);
            state.delays.get(&month).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.lock().unwrap();
        if state.fail_fetch {
            return Err(Error::rejected(500, Some("database unavailable".into())));
        }
        Ok(days_of(month)
            .into_iter()
            .map(|date| state.entries.get(&date).cloned().unwrap_or_else(|| DayEntry::empty(date)))
            .collect())
    }

    async fn session(&self) -> Result<SessionInfo> {
        let state = self.state.lock().unwrap();
        Ok(SessionInfo { logged_in: state.logged_in, username: state.logged_in.then(|| "admin".to_string()) })
    }

    async fn login(&self, credentials: &Credentials) -> Result<()> {
        if credentials.username == "admin" && credentials.password == "secret" {
            self.set_logged_in(true);
            Ok(())
        } else {
            Err(Error::rejected(401, Some("invalid credentials".into())))
        }
    }

    async fn logout(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.logged_in = false;
        state.logouts += 1;
        Ok(())
    }

    async fn save_entry(&self, entry: &DayEntry) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.logged_in {
            return Err(Error::rejected(401, Some("unauthorized".into())));
        }
        if let Some((status, message)) = state.save_error.clone() {
            return Err(Error::rejected(status, message));
        }
        NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d").map_err(|_| Error::rejected(400, Some("invalid date".into())))?;
        state.saves.push(entry.clone());
        if entry.status.is_none() {
            state.entries.remove(&entry.date);
        } else {
            state.entries.insert(entry.date.clone(), entry.clone());
        }
        Ok(())
    }
}

/// An app over `server` showing `month`, with the initial load applied.
pub async fn loaded_app(server: &Arc<FakeServer>, month: MonthKey) -> App {
    let service: Arc<dyn CalendarService> = Arc::clone(server) as Arc<dyn CalendarService>;
    let mut app = App::new(Config::default(), service, month);
    app.start();
    app.wait_for_updates().await;
    app
}
