//! End-to-end behaviour of the calendar client against an in-memory server.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

mod common;

use attendance_tui::input::{Action, FieldEdit, Overlay};
use attendance_tui::month::Tile;
use attendance_tui::types::MonthKey;
use common::{loaded_app, FakeServer};
use std::time::Duration;

const JUNE_2024: MonthKey = MonthKey { year: 2024, month: 6 };

fn tile_for(app: &attendance_tui::app::App, day: u32) -> attendance_tui::month::DayTile {
    app.tiles
        .iter()
        .filter_map(Tile::as_day)
        .find(|t| t.day == day)
        .cloned()
        .unwrap_or_else(|| panic!("no tile for day {day}"))
}

fn open_day(app: &mut attendance_tui::app::App, day: u32) {
    app.dispatch(Action::SelectDay(day));
    app.dispatch(Action::OpenSelected);
}

#[tokio::test]
async fn initial_load_builds_grid_and_session() {
    let server = FakeServer::new();
    let app = loaded_app(&server, JUNE_2024).await;

    // 1 June 2024 was a Saturday.
    assert_eq!(app.month.days_in_month, 30);
    assert_eq!(app.tiles.iter().filter(|t| **t == Tile::Blank).count(), 6);
    assert_eq!(app.tiles.len(), 36);
    assert!(!app.session.logged_in);
    assert!(!app.is_loading());
    assert_eq!(server.fetches(), vec![JUNE_2024]);
}

#[tokio::test]
async fn saving_absent_reloads_month_and_shows_pill() {
    let server = FakeServer::new();
    server.set_logged_in(true);
    let mut app = loaded_app(&server, JUNE_2024).await;
    assert!(app.session.logged_in);

    open_day(&mut app, 15);
    assert!(app.detail.is_some());
    app.dispatch(Action::CycleStatus { forward: true });
    app.dispatch(Action::CycleStatus { forward: true });
    app.dispatch(Action::NextField);
    app.dispatch(Action::Edit(FieldEdit::Paste("  sick ".into())));
    app.dispatch(Action::SaveDetail);
    app.wait_for_updates().await;

    assert!(app.detail.is_none());
    assert_eq!(server.fetches(), vec![JUNE_2024, JUNE_2024]);
    let saved = server.saves();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].date, "2024-06-15");
    assert_eq!(saved[0].status.as_str(), "absent");
    assert_eq!(saved[0].reason, "sick");

    let tile = tile_for(&app, 15);
    assert_eq!(tile.entry.status.as_str(), "absent");
    assert_eq!(tile.reason_pill(), Some("sick"));
}

#[tokio::test]
async fn unauthorized_save_switches_to_login() {
    let server = FakeServer::new();
    server.set_logged_in(true);
    let mut app = loaded_app(&server, JUNE_2024).await;
    let before = app.month.clone();

    // Session expires on the server while the editor is open.
    server.set_logged_in(false);
    open_day(&mut app, 10);
    app.dispatch(Action::CycleStatus { forward: true });
    app.dispatch(Action::SaveDetail);
    app.wait_for_updates().await;

    assert!(app.detail.is_none());
    assert!(app.login_visible);
    assert_eq!(app.notice.as_deref(), Some("You must log in to edit."));
    assert_eq!(app.month, before);
    assert!(server.saves().is_empty());
}

#[tokio::test]
async fn rejected_save_keeps_editor_open() {
    let server = FakeServer::new();
    server.set_logged_in(true);
    let mut app = loaded_app(&server, JUNE_2024).await;
    server.state.lock().unwrap().save_error = Some((400, Some("invalid status".into())));

    open_day(&mut app, 3);
    app.dispatch(Action::SaveDetail);
    app.wait_for_updates().await;

    assert!(app.detail.is_some());
    assert_eq!(app.notice.as_deref(), Some("Save failed: invalid status"));

    // Without a message the status code is shown.
    server.state.lock().unwrap().save_error = Some((500, None));
    app.dispatch(Action::DismissNotice);
    app.dispatch(Action::SaveDetail);
    app.wait_for_updates().await;
    assert_eq!(app.notice.as_deref(), Some("Save failed: 500"));
}

#[tokio::test]
async fn anonymous_open_is_read_only() {
    let server = FakeServer::new();
    server.record("2024-06-03", "present", "");
    let mut app = loaded_app(&server, JUNE_2024).await;

    open_day(&mut app, 3);

    assert!(app.detail.is_none());
    let info = app.info.clone().unwrap();
    assert_eq!(info.date, "2024-06-03");
    assert_eq!(info.status_label, "Present");
    assert_eq!(info.reason, "—");

    app.dispatch(Action::Close(Overlay::Info));
    assert!(app.info.is_none());
}

#[tokio::test]
async fn tile_opens_its_render_time_snapshot() {
    let server = FakeServer::new();
    server.record("2024-06-20", "leave", "trip");
    let mut app = loaded_app(&server, JUNE_2024).await;

    // Server data changes, but the grid has not been re-fetched.
    server.record("2024-06-20", "present", "");
    open_day(&mut app, 20);

    let info = app.info.clone().unwrap();
    assert_eq!(info.status_label, "Leave");
    assert_eq!(info.reason, "trip");
}

#[tokio::test]
async fn clear_resets_form_without_request() {
    let server = FakeServer::new();
    server.set_logged_in(true);
    server.record("2024-06-12", "exam", "finals");
    let mut app = loaded_app(&server, JUNE_2024).await;

    open_day(&mut app, 12);
    app.dispatch(Action::ClearDetail);

    let form = app.detail.clone().unwrap();
    assert!(form.status().is_none());
    assert_eq!(form.reason.value(), "");
    assert!(!app.is_loading());
    assert!(server.saves().is_empty());

    // Saving the cleared form removes the entry.
    app.dispatch(Action::SaveDetail);
    app.wait_for_updates().await;
    assert!(!tile_for(&app, 12).entry.has_status());
}

#[tokio::test]
async fn closing_editor_discards_edits() {
    let server = FakeServer::new();
    server.set_logged_in(true);
    let mut app = loaded_app(&server, JUNE_2024).await;

    open_day(&mut app, 5);
    app.dispatch(Action::CycleStatus { forward: true });
    app.dispatch(Action::Close(Overlay::Detail));
    assert!(app.detail.is_none());

    open_day(&mut app, 5);
    assert!(app.detail.as_ref().unwrap().status().is_none());
    assert!(server.saves().is_empty());
}

#[tokio::test]
async fn stale_month_response_is_discarded() {
    let server = FakeServer::new();
    server.state.lock().unwrap().delays.insert(JUNE_2024, Duration::from_millis(200));

    let mut app = loaded_app(&server, MonthKey::new(2024, 5)).await;
    app.dispatch(Action::NextMonth); // June, slow
    app.dispatch(Action::NextMonth); // July, fast
    app.wait_for_updates().await;

    assert_eq!(app.current, MonthKey::new(2024, 7));
    assert_eq!(app.month.key, MonthKey::new(2024, 7));
    assert_eq!(app.month.days_in_month, 31);
}

#[tokio::test]
async fn failed_fetch_keeps_rendered_month() {
    let server = FakeServer::new();
    let mut app = loaded_app(&server, JUNE_2024).await;
    let before = app.month.clone();

    server.state.lock().unwrap().fail_fetch = true;
    server.set_logged_in(true);
    app.dispatch(Action::NextMonth);
    app.wait_for_updates().await;

    assert_eq!(app.notice.as_deref(), Some("Failed to fetch calendar"));
    assert_eq!(app.month, before);
    assert_eq!(app.current, MonthKey::new(2024, 7));
    // Session is re-synchronised even though the fetch failed.
    assert!(app.session.logged_in);
}

#[tokio::test]
async fn navigation_round_trips_across_year_boundary() {
    let server = FakeServer::new();
    let december = MonthKey::new(2024, 12);
    let mut app = loaded_app(&server, december).await;

    app.dispatch(Action::NextMonth);
    app.wait_for_updates().await;
    assert_eq!(app.month.key, MonthKey::new(2025, 1));

    app.dispatch(Action::PrevMonth);
    app.wait_for_updates().await;
    assert_eq!(app.month.key, december);
}

#[tokio::test]
async fn login_then_logout() {
    let server = FakeServer::new();
    let mut app = loaded_app(&server, JUNE_2024).await;

    app.dispatch(Action::ShowLogin);
    app.dispatch(Action::Edit(FieldEdit::Paste(" admin ".into())));
    app.dispatch(Action::NextField);
    app.dispatch(Action::Edit(FieldEdit::Paste("secret".into())));
    app.dispatch(Action::SubmitLogin);
    app.wait_for_updates().await;

    assert!(!app.login_visible);
    assert!(app.session.logged_in);
    assert_eq!(app.session.username.as_deref(), Some("admin"));

    app.dispatch(Action::Logout);
    app.wait_for_updates().await;
    assert!(!app.session.logged_in);
    assert_eq!(server.state.lock().unwrap().logouts, 1);
    assert_eq!(server.fetches().len(), 3);
}

#[tokio::test]
async fn failed_login_reports_and_keeps_prompt() {
    let server = FakeServer::new();
    let mut app = loaded_app(&server, JUNE_2024).await;

    app.dispatch(Action::ShowLogin);
    app.dispatch(Action::Edit(FieldEdit::Paste("admin".into())));
    app.dispatch(Action::NextField);
    app.dispatch(Action::Edit(FieldEdit::Paste("wrong".into())));
    app.dispatch(Action::SubmitLogin);
    app.wait_for_updates().await;

    assert!(app.login_visible);
    assert_eq!(app.notice.as_deref(), Some("Login failed: invalid credentials"));
    assert!(!app.session.logged_in);
    // The typed password is left in place.
    assert_eq!(app.login_form.password.value(), "wrong");
}

#[tokio::test]
async fn selection_is_clamped_to_month() {
    let server = FakeServer::new();
    let mut app = loaded_app(&server, MonthKey::new(2024, 1)).await;

    app.dispatch(Action::SelectDay(31));
    app.dispatch(Action::MoveSelection(7));
    assert_eq!(app.selected_day, 31);

    app.dispatch(Action::NextMonth);
    app.wait_for_updates().await;
    assert_eq!(app.selected_day, 29);
}

#[tokio::test]
async fn late_save_reply_leaves_other_day_editor_open() {
    let server = FakeServer::new();
    server.set_logged_in(true);
    let mut app = loaded_app(&server, JUNE_2024).await;

    open_day(&mut app, 3);
    app.dispatch(Action::CycleStatus { forward: true });
    app.dispatch(Action::SaveDetail);
    app.dispatch(Action::Close(Overlay::Detail));

    // Day 5 is being edited by the time the day 3 reply arrives.
    open_day(&mut app, 5);
    app.dispatch(Action::CycleStatus { forward: true });
    app.dispatch(Action::CycleStatus { forward: true });
    app.wait_for_updates().await;

    let form = app.detail.clone().unwrap();
    assert_eq!(form.date, "2024-06-05");
    assert_eq!(form.status().as_str(), "absent");
    assert_eq!(server.saves()[0].date, "2024-06-03");
    assert_eq!(tile_for(&app, 3).entry.status.as_str(), "present");
}

#[tokio::test]
async fn late_unauthorized_reply_does_not_close_other_editor() {
    let server = FakeServer::new();
    server.set_logged_in(true);
    let mut app = loaded_app(&server, JUNE_2024).await;
    server.set_logged_in(false);

    open_day(&mut app, 3);
    app.dispatch(Action::SaveDetail);
    app.dispatch(Action::Close(Overlay::Detail));
    open_day(&mut app, 5);
    app.wait_for_updates().await;

    assert_eq!(app.detail.as_ref().map(|f| f.date.as_str()), Some("2024-06-05"));
    assert!(!app.login_visible);
    assert_eq!(app.notice.as_deref(), Some("You must log in to edit."));
}
