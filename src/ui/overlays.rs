use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use crate::constants::ui::{DETAIL_WIDTH, LOGIN_WIDTH};
use crate::form::{DetailField, DetailForm, InfoView, LoginField, LoginForm, TextField};
use crate::ui::calendar::status_color;
use crate::ui::{centered_rect, create_modal_block};

const LABEL_WIDTH: u16 = 10;

fn label(text: &str) -> Span<'_> {
    Span::styled(format!("{text:<10}"), Style::default().fg(Color::Gray))
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

/// Place the terminal cursor inside a text field drawn at `line` of `inner`.
#[allow(clippy::cast_possible_truncation)]
fn place_cursor(f: &mut Frame, inner: Rect, line: u16, field: &TextField) {
    let x = inner.x + LABEL_WIDTH + field.cursor() as u16;
    if x < inner.right() && line < inner.height {
        f.set_cursor(x, inner.y + line);
    }
}

/// Draw the login prompt and return its panel area.
pub fn draw_login(f: &mut Frame, form: &LoginForm) -> Rect {
    let area = centered_rect(LOGIN_WIDTH, 7, f.size());
    let block = create_modal_block(" Log in ", Color::Cyan);
    let inner = block.inner(area);

    let user_focused = form.focus == LoginField::Username;
    let lines = vec![
        Line::from(vec![label("User"), Span::styled(form.username.value(), focus_style(user_focused))]),
        Line::from(vec![label("Password"), Span::styled(form.masked_password(), focus_style(!user_focused))]),
        Line::from(""),
        Line::from(Span::styled("Enter to log in, Esc to cancel", Style::default().fg(Color::Gray))),
    ];

    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines), inner);

    match form.focus {
        LoginField::Username => place_cursor(f, inner, 0, &form.username),
        LoginField::Password => place_cursor(f, inner, 1, &form.password),
    }
    area
}

/// Draw the day editor and return its panel area.
pub fn draw_detail(f: &mut Frame, form: &DetailForm) -> Rect {
    let area = centered_rect(DETAIL_WIDTH, 8, f.size());
    let block = create_modal_block(" Edit day ", Color::Yellow);
    let inner = block.inner(area);

    let status = form.status();
    let status_focused = form.focus == DetailField::Status;
    let status_style = if status.is_none() {
        focus_style(status_focused)
    } else {
        focus_style(status_focused).fg(status_color(status))
    };

    let lines = vec![
        Line::from(vec![label("Date"), Span::styled(form.date.as_str(), Style::default().fg(Color::White))]),
        Line::from(vec![
            label("Status"),
            Span::styled("◀ ", focus_style(status_focused)),
            Span::styled(status.label(), status_style),
            Span::styled(" ▶", focus_style(status_focused)),
        ]),
        Line::from(vec![label("Reason"), Span::styled(form.reason.value(), focus_style(!status_focused))]),
        Line::from(""),
        Line::from(Span::styled("Enter save · ^X clear · Esc close", Style::default().fg(Color::Gray))),
    ];

    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines), inner);

    if form.focus == DetailField::Reason {
        place_cursor(f, inner, 2, &form.reason);
    }
    area
}

/// Draw the read-only day view and return its panel area.
pub fn draw_info(f: &mut Frame, info: &InfoView) -> Rect {
    let area = centered_rect(DETAIL_WIDTH, 7, f.size());
    let block = create_modal_block(" Day ", Color::Cyan);
    let inner = block.inner(area);

    let value = Style::default().fg(Color::White);
    let lines = vec![
        Line::from(vec![label("Date"), Span::styled(info.date.as_str(), value)]),
        Line::from(vec![label("Status"), Span::styled(info.status_label.as_str(), value)]),
        Line::from(vec![label("Reason"), Span::styled(info.reason.as_str(), value)]),
        Line::from(""),
        Line::from(Span::styled("Esc to close", Style::default().fg(Color::Gray))),
    ];

    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    area
}
