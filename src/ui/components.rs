use crate::models::Task;
use crate::ui::theme::ThemeTokens;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::ListItem,
};

/// Helper function to calculate centered popup position
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Fixed-height popup centered in `r`.
pub fn centered_box(percent_x: u16, height: u16, r: Rect) -> Rect {
    let area = centered_rect(percent_x, 100, r);
    let height = height.min(r.height);
    Rect {
        x: area.x,
        y: r.y + r.height.saturating_sub(height) / 2,
        width: area.width,
        height,
    }
}

/// A task card: time label on the first line, wrapped description below.
pub fn task_card(task: &Task, width: usize, is_selected: bool, tokens: &ThemeTokens) -> ListItem<'static> {
    let marker = if is_selected { "▶ " } else { "  " };
    let mut header = vec![Span::styled(
        marker.to_string(),
        Style::default().fg(tokens.selected).add_modifier(Modifier::BOLD),
    )];
    if !task.time.is_empty() {
        header.push(Span::styled(
            task.time.clone(),
            Style::default().fg(tokens.time_label),
        ));
    }

    let mut desc_style = Style::default().fg(tokens.status_color(task.status));
    if is_selected {
        desc_style = desc_style.fg(tokens.selected).add_modifier(Modifier::BOLD);
    }

    let mut lines = vec![Line::from(header)];
    let wrap_width = width.saturating_sub(2).max(8);
    for chunk in textwrap::wrap(&task.desc, wrap_width) {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(chunk.into_owned(), desc_style),
        ]));
    }
    lines.push(Line::from(""));
    ListItem::new(lines)
}

const DIGIT_ROWS: usize = 5;

fn glyph(c: char) -> [&'static str; DIGIT_ROWS] {
    match c {
        '0' => ["███", "█ █", "█ █", "█ █", "███"],
        '1' => ["  █", "  █", "  █", "  █", "  █"],
        '2' => ["███", "  █", "███", "█  ", "███"],
        '3' => ["███", "  █", "███", "  █", "███"],
        '4' => ["█ █", "█ █", "███", "  █", "  █"],
        '5' => ["███", "█  ", "███", "  █", "███"],
        '6' => ["███", "█  ", "███", "█ █", "███"],
        '7' => ["███", "  █", "  █", "  █", "  █"],
        '8' => ["███", "█ █", "███", "█ █", "███"],
        '9' => ["███", "█ █", "███", "  █", "███"],
        ':' => [" ", "█", " ", "█", " "],
        _ => [" ", " ", " ", " ", " "],
    }
}

/// Renders `MM:SS` as block digits for the focus view.
pub fn big_clock(text: &str) -> Vec<String> {
    (0..DIGIT_ROWS)
        .map(|row| {
            text.chars()
                .map(|c| glyph(c)[row])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
