use super::components::{big_clock, centered_box, centered_rect};
use crate::app::App;
use crate::models::InputMode;
use crate::pomodoro::TimerState;
use crate::ui::theme::ThemeTokens;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

pub fn render_alert_popup(f: &mut Frame, app: &App) {
    let area = centered_rect(70, 40, f.area());
    f.render_widget(Clear, area);

    let message = app.alert_message.as_deref().unwrap_or("Time's up.");
    let lines = vec![
        Line::from(Span::styled(
            "⏰  TIME'S UP!  ⏰",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Stretch. Drink water.",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

pub fn render_help_popup(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);

    let global = &app.config.keybindings.global;
    let board = &app.config.keybindings.board;
    let rows: Vec<(&str, &Vec<String>)> = vec![
        ("Import CSV file", &global.import_file),
        ("Load Google Sheet", &global.import_sheet),
        ("Next / previous day", &board.next_day),
        ("", &board.prev_day),
        ("Move cursor", &board.up),
        ("", &board.down),
        ("Focus column", &board.column_left),
        ("", &board.column_right),
        ("Move card left", &board.move_left),
        ("Move card right", &board.move_right),
        ("Select task for Pomodoro", &board.select),
        ("Start timer", &board.start_timer),
        ("Pause timer", &board.pause_timer),
        ("Reset timer", &board.reset_timer),
        ("Timer durations", &global.durations),
        ("Rewards", &global.rewards),
        ("Focus view", &global.focus_view),
        ("Open data folder", &global.data_dir),
        ("Quit", &global.quit),
    ];

    let items: Vec<ListItem> = rows
        .into_iter()
        .map(|(label, keys)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<26}", label),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(keys.join(", ")),
            ]))
        })
        .collect();

    let block = Block::default()
        .title(" Help (Esc to close) ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    f.render_widget(List::new(items).block(block), area);
}

pub fn render_rewards_popup(f: &mut Frame, app: &mut App, tokens: &ThemeTokens) {
    let area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);

    let balance = app.reward_points();
    let items: Vec<ListItem> = app
        .config
        .rewards
        .iter()
        .map(|reward| {
            let affordable = balance >= reward.cost;
            let style = if affordable {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(Line::from(vec![
                Span::styled(reward.name.clone(), style),
                Span::styled(
                    format!("  (cost: {} pts)", reward.cost),
                    style.fg(if affordable { tokens.points } else { Color::DarkGray }),
                ),
            ]))
        })
        .collect();

    let block = Block::default()
        .title(format!(" Rewards · {balance} points (Enter to claim) "))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(tokens.highlight_bg))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut app.reward_list_state);
}

pub fn render_prompt_popup(f: &mut Frame, app: &mut App, tokens: &ThemeTokens) {
    let area = centered_box(70, 3, f.area());
    f.render_widget(Clear, area);

    let title = match app.input_mode {
        InputMode::ImportSheet => " Load Google Sheet ",
        _ => " Import CSV ",
    };
    app.prompt.set_block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(tokens.border_focus)),
    );
    app.prompt.set_cursor_line_style(Style::default());
    f.render_widget(&app.prompt, area);
}

pub fn render_durations_popup(f: &mut Frame, app: &App, tokens: &ThemeTokens) {
    let area = centered_box(40, 6, f.area());
    f.render_widget(Clear, area);

    let field = |label: &str, value: &str, active: bool| {
        let style = if active {
            Style::default()
                .fg(tokens.border_focus)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let cursor = if active { "_" } else { "" };
        Line::from(vec![
            Span::raw(format!("{label:<8}")),
            Span::styled(format!("{value}{cursor}"), style),
            Span::raw(" min"),
        ])
    };

    let lines = vec![
        field("Work", &app.work_minutes_input, app.duration_field == 0),
        field("Break", &app.break_minutes_input, app.duration_field == 1),
        Line::from(""),
        Line::from(Span::styled(
            "Tab switch · Enter done",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let block = Block::default()
        .title(" Timer durations ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_focus_view(f: &mut Frame, app: &App, tokens: &ThemeTokens) {
    let area = f.area();
    f.render_widget(Clear, area);

    let timer = app.timer();
    let color = match timer.state() {
        TimerState::Running => tokens.border_focus,
        TimerState::Paused => tokens.todo,
        TimerState::Idle => tokens.border_default,
    };

    let clock = big_clock(&timer.display());
    let mut lines: Vec<Line> = clock
        .into_iter()
        .map(|row| Line::from(Span::styled(row, Style::default().fg(color))))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "{} · {}",
        timer.period().label(),
        app.selected_task_desc().unwrap_or("no task selected")
    )));

    let height = lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .title(" Focus (Esc to exit) "),
        area,
    );
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        chunks[1],
    );
}
