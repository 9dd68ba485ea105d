use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::constants::ui::{GRID_COLUMNS, GRID_ROWS, WEEKDAYS};
use crate::month::{DayTile, Tile};
use crate::types::Status;

/// Colour used to tag a tile with its status.
pub fn status_color(status: &Status) -> Color {
    match status.as_str() {
        "present" => Color::Green,
        "absent" => Color::Red,
        "exam" => Color::Blue,
        "leave" => Color::Magenta,
        _ => Color::Cyan,
    }
}

/// Draw the week-aligned month grid and record each day tile's area.
#[allow(clippy::cast_possible_truncation)]
pub fn draw_calendar(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width < GRID_COLUMNS || inner.height < 2 {
        return;
    }

    let col_width = inner.width / GRID_COLUMNS;

    // Weekday header
    for (i, name) in WEEKDAYS.iter().enumerate() {
        let style = if i == 0 {
            Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)
        };
        let cell = Rect { x: inner.x + i as u16 * col_width, y: inner.y, width: col_width, height: 1 };
        f.render_widget(Paragraph::new(format!(" {name}")).style(style), cell);
    }

    let rows = (app.tiles.len() as u16).div_ceil(GRID_COLUMNS).clamp(1, GRID_ROWS);
    let row_height = (inner.height - 1) / rows;
    if row_height == 0 {
        return;
    }

    for (index, tile) in app.tiles.iter().enumerate() {
        let col = index as u16 % GRID_COLUMNS;
        let row = index as u16 / GRID_COLUMNS;
        let cell = Rect {
            x: inner.x + col * col_width,
            y: inner.y + 1 + row * row_height,
            width: col_width,
            height: row_height,
        };
        if let Tile::Day(day) = tile {
            draw_day_tile(f, day, day.day == app.selected_day, cell);
            app.layout.tiles.push((index, cell));
        }
    }
}

fn draw_day_tile(f: &mut Frame, tile: &DayTile, selected: bool, area: Rect) {
    let border = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if tile.entry.has_status() {
        Style::default().fg(status_color(&tile.entry.status))
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default().borders(Borders::ALL).border_style(border);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let day_style = if tile.is_sunday {
        Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    let mut lines = vec![Line::from(Span::styled(tile.day.to_string(), day_style))];

    if tile.entry.has_status() {
        let color = status_color(&tile.entry.status);
        lines.push(Line::from(Span::styled(tile.entry.status.label(), Style::default().fg(color))));
        if let Some(reason) = tile.reason_pill() {
            lines.push(Line::from(Span::styled(
                format!(" {reason} "),
                Style::default().fg(Color::Black).bg(color),
            )));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}
