//! User interface components.
//!
//! Provides TUI widgets and drawing functions for the application's
//! terminal-based user interface using ratatui.

mod calendar;
mod overlays;

pub use calendar::draw_calendar;
pub use overlays::{draw_detail, draw_info, draw_login};

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, ScreenLayout};
use crate::input::Focus;

/// Render the full application UI to the terminal frame.
pub fn draw(f: &mut Frame, app: &mut App) {
    app.layout = ScreenLayout::default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Month header
            Constraint::Min(1),
            Constraint::Length(3), // Command/status bar at bottom
        ])
        .split(f.size());

    draw_header(f, app, chunks[0]);
    draw_calendar(f, app, chunks[1]);
    draw_command_bar(f, app, chunks[2]);

    // Overlays are independent; draw every visible one, topmost last.
    if let Some(info) = &app.info {
        app.layout.overlay = Some(draw_info(f, info));
    }
    if let Some(detail) = &app.detail {
        app.layout.overlay = Some(draw_detail(f, detail));
    }
    if app.login_visible {
        app.layout.overlay = Some(draw_login(f, &app.login_form));
    }

    if app.is_loading() {
        draw_loading_indicator(f, chunks[0]);
    }

    if app.show_help {
        draw_help_modal(f);
    }

    // Draw notice modal (blocking)
    if let Some(notice) = &app.notice {
        draw_notice(f, notice);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn draw_header(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightBlue))
        .title(Span::styled(
            " Attendance ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width < 8 || inner.height == 0 {
        return;
    }

    let label = app.month.key.label();
    let label_width = label.chars().count() as u16;
    let prev = Rect { x: inner.x + 1, y: inner.y, width: 3, height: 1 };
    let next = Rect { x: (inner.x + 5 + label_width).min(inner.right().saturating_sub(3)), y: inner.y, width: 3, height: 1 };
    let label_area = Rect { x: inner.x + 5, y: inner.y, width: label_width.min(inner.width.saturating_sub(5)), height: 1 };

    let arrow = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    f.render_widget(Paragraph::new("◀").style(arrow).alignment(Alignment::Center), prev);
    f.render_widget(
        Paragraph::new(label).style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        label_area,
    );
    f.render_widget(Paragraph::new("▶").style(arrow).alignment(Alignment::Center), next);
    app.layout.prev = Some(prev);
    app.layout.next = Some(next);

    let session_text = match (&app.session.logged_in, &app.session.username) {
        (true, Some(name)) => format!("Signed in as {name} "),
        (true, None) => "Signed in ".to_string(),
        (false, _) => "Read-only ".to_string(),
    };
    let session_style = if app.session.logged_in {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Gray)
    };
    f.render_widget(
        Paragraph::new(session_text).style(session_style).alignment(Alignment::Right),
        Rect { y: inner.y, height: 1, ..inner },
    );
}

fn draw_command_bar(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled("Commands/Status", Style::default().fg(Color::Yellow)));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let help_text = match app.focus() {
        Focus::Notice => create_help_text(&[("Esc/Enter", "Dismiss")]),
        Focus::Help => create_help_text(&[("Esc", "Close help")]),
        Focus::Login => create_help_text(&[("Tab", "Switch field"), ("Enter", "Log in"), ("Esc", "Cancel")]),
        Focus::Detail => create_help_text(&[
            ("Tab", "Switch field"),
            ("←/→", "Status"),
            ("Enter/^S", "Save"),
            ("^X", "Clear"),
            ("Esc", "Close"),
        ]),
        Focus::Info => create_help_text(&[("Esc", "Close")]),
        Focus::Calendar => {
            let account = if app.session.logged_in { ("O", "Log out") } else { ("L", "Log in") };
            create_help_text(&[
                ("Arrows", "Move"),
                ("Enter", "Open"),
                ("[/]", "Month"),
                ("t", "Today"),
                ("r", "Reload"),
                account,
                ("?", "Help"),
                ("q", "Quit"),
            ])
        }
    };

    let status_bar = Paragraph::new(Line::from(help_text)).style(Style::default().fg(Color::Gray));
    f.render_widget(status_bar, inner_area);
}

/// Build styled help text spans from key-description pairs for the command bar.
pub fn create_help_text<'a>(commands: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut text = vec![Span::raw(" ")]; // Start with padding

    for (i, (key, description)) in commands.iter().enumerate() {
        text.push(Span::styled(*key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
        text.push(Span::raw(format!(": {description}")));
        if i < commands.len() - 1 {
            text.push(Span::raw(" | "));
        }
    }

    text
}

/// Create a bordered modal block with a coloured title.
pub fn create_modal_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .title(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(Color::Black))
}

/// A `width` x `height` rectangle centred in `area`, shrunk to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

// Draw a loading indicator in the header
#[allow(clippy::cast_possible_truncation)]
fn draw_loading_indicator(f: &mut Frame, header: Rect) {
    let text = " Loading… ";
    let width = text.chars().count() as u16;
    if header.width <= width + 2 {
        return;
    }
    let area = Rect { x: header.x + (header.width - width) / 2, y: header.y, width, height: 1 };
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        area,
    );
}

/// Rows needed for a notice of `text_width` columns wrapped inside a box `width` wide.
fn notice_height(text_width: usize, width: u16) -> u16 {
    let inner_width = usize::from(width.saturating_sub(4)).max(1);
    let msg_lines = text_width.div_ceil(inner_width).max(1);
    u16::try_from(msg_lines).unwrap_or(u16::MAX).saturating_add(4)
}

#[allow(clippy::cast_possible_truncation)]
fn draw_notice(f: &mut Frame, message: &str) {
    use unicode_width::UnicodeWidthStr;
    let size = f.size();

    // Calculate box width (max 80% of screen, min 40)
    let max_width = (size.width as usize * 80) / 100;
    let width = message.width().saturating_add(6).min(max_width).max(40) as u16;

    let height = notice_height(message.width(), width);

    let area = centered_rect(width, height, size);
    let block = create_modal_block("Notice", Color::Red);

    let text = Paragraph::new(message)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let inner_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // message (flexible)
            Constraint::Length(1), // hint
        ])
        .margin(1)
        .split(area);

    f.render_widget(text, inner_area[0]);

    let hint = Paragraph::new("Press Esc to dismiss")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);

    f.render_widget(hint, inner_area[1]);
}

// Draw the help modal with keybindings
fn draw_help_modal(f: &mut Frame) {
    let area = centered_rect(56, 22, f.size());
    let block = create_modal_block(" Help - Keybindings ", Color::Cyan);

    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let inner_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1)])
        .margin(1)
        .split(area)[0];

    let help_text: Vec<Line> = HELP_LINES
        .iter()
        .map(|(key, desc, is_header)| {
            if *is_header {
                Line::from(Span::styled(*key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)))
            } else {
                Line::from(vec![
                    Span::styled(format!("{key:>12}"), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    Span::styled(*desc, Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    f.render_widget(Paragraph::new(help_text).wrap(Wrap { trim: true }), inner_area);
}

const HELP_LINES: &[(&str, &str, bool)] = &[
    ("── Calendar ──", "", true),
    ("←↑↓→ / hjkl", "Move between days", false),
    ("Enter/Space", "Open day (edit when logged in)", false),
    ("[ / ]", "Previous / next month", false),
    ("t", "Jump to today", false),
    ("r", "Reload month", false),
    ("L / O", "Log in / log out", false),
    ("Mouse", "Click a day or ◀ ▶", false),
    ("", "", false),
    ("── Day editor ──", "", true),
    ("←/→", "Change status", false),
    ("Tab", "Switch status / reason", false),
    ("Enter, ^S", "Save", false),
    ("^X", "Clear (save to apply)", false),
    ("Esc", "Close without saving", false),
    ("", "", false),
    ("Press Esc, F1 or ? to close", "", true),
];
