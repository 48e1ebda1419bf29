use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, List, Paragraph, Tabs},
};

use crate::app::App;
use crate::models::{InputMode, TaskStatus, day_label};
use crate::pomodoro::{TimerState, format_clock};
use unicode_width::UnicodeWidthStr;

pub mod color_parser;
pub mod components;
pub mod popups;
pub mod theme;

use components::task_card;
use popups::{
    render_alert_popup, render_durations_popup, render_focus_view, render_help_popup,
    render_prompt_popup, render_rewards_popup,
};

pub fn ui(f: &mut Frame, app: &mut App) {
    let tokens = theme::ThemeTokens::from_theme(&app.config.theme);

    if app.show_focus_view {
        render_focus_view(f, app, &tokens);
        if app.alert_message.is_some() {
            render_alert_popup(f, app);
        }
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_day_tabs(f, chunks[0], app, &tokens);
    render_progress(f, chunks[1], app, &tokens);
    render_columns(f, chunks[2], app, &tokens);
    render_timer_bar(f, chunks[3], app, &tokens);
    render_status_bar(f, chunks[4], app, &tokens);

    match app.input_mode {
        InputMode::ImportFile | InputMode::ImportSheet => render_prompt_popup(f, app, &tokens),
        InputMode::Durations => render_durations_popup(f, app, &tokens),
        InputMode::Navigate => {}
    }
    if app.show_rewards_popup {
        render_rewards_popup(f, app, &tokens);
    }
    if app.show_help_popup {
        render_help_popup(f, app);
    }
    if app.alert_message.is_some() {
        render_alert_popup(f, app);
    }
}

fn render_day_tabs(f: &mut Frame, area: Rect, app: &App, tokens: &theme::ThemeTokens) {
    let keys = app.day_keys();
    let block = Block::default()
        .title(" Days ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(tokens.border_default));

    if keys.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "No schedule yet. Press i to import a CSV or u to load a Google Sheet.",
            Style::default().fg(tokens.time_label),
        )))
        .block(block);
        f.render_widget(hint, area);
        return;
    }

    let selected = app
        .active_day()
        .and_then(|active| keys.iter().position(|key| key == active))
        .unwrap_or(0);
    let titles: Vec<Line> = keys.iter().map(|key| Line::from(day_label(key))).collect();
    let tabs = Tabs::new(titles)
        .block(block)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(tokens.border_focus)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    f.render_widget(tabs, area);
}

fn render_progress(f: &mut Frame, area: Rect, app: &App, tokens: &theme::ThemeTokens) {
    let percent = app.progress_percent().min(100);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(tokens.border_default)),
        )
        .gauge_style(Style::default().fg(tokens.completed))
        .percent(percent)
        .label(format!(
            "{percent}% complete ({} tasks)",
            app.active_tasks().len()
        ));
    f.render_widget(gauge, area);
}

fn render_columns(f: &mut Frame, area: Rect, app: &mut App, tokens: &theme::ThemeTokens) {
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for status in TaskStatus::all() {
        let column_area = areas[status.index()];
        let focused = app.focus_column == status && app.input_mode == InputMode::Navigate;
        let selected_id = app.selected_task().map(str::to_string);
        let inner_width = column_area.width.saturating_sub(4) as usize;

        let cards: Vec<_> = app
            .tasks_in_column(status)
            .into_iter()
            .map(|task| {
                let is_selected = selected_id.as_deref() == Some(task.id.as_str());
                task_card(task, inner_width, is_selected, tokens)
            })
            .collect();
        let count = cards.len();

        let border_color = if focused {
            tokens.border_focus
        } else {
            tokens.border_default
        };
        let block = Block::default()
            .title(Line::from(vec![
                Span::styled(
                    format!(" {} ", status.title()),
                    Style::default()
                        .fg(tokens.status_color(status))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("({count}) ")),
            ]))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        let mut list = List::new(cards).block(block);
        if focused {
            list = list.highlight_style(Style::default().bg(tokens.highlight_bg));
        }
        f.render_stateful_widget(list, column_area, &mut app.column_states[status.index()]);
    }
}

fn render_timer_bar(f: &mut Frame, area: Rect, app: &App, tokens: &theme::ThemeTokens) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let timer = app.timer();
    let state_label = match timer.state() {
        TimerState::Idle => "idle",
        TimerState::Running => "running",
        TimerState::Paused => "paused",
    };
    let durations = app.durations();
    let task_label = app
        .selected_task_desc()
        .map(|desc| format!(" · {desc}"))
        .unwrap_or_default();
    let timer_line = Line::from(vec![
        Span::styled(
            format_clock(app.timer_remaining()),
            Style::default()
                .fg(tokens.border_focus)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  {} ({state_label}) {}/{}m{task_label}",
            timer.period().label(),
            durations.work_minutes,
            durations.break_minutes
        )),
    ]);
    f.render_widget(
        Paragraph::new(timer_line).block(
            Block::default()
                .title(" Pomodoro ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        ),
        halves[0],
    );

    let points = Paragraph::new(Line::from(Span::styled(
        format!("{} points", app.reward_points()),
        Style::default()
            .fg(tokens.points)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(" Rewards ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(points, halves[1]);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App, tokens: &theme::ThemeTokens) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let mode_label = match app.input_mode {
        InputMode::Navigate => "BOARD",
        InputMode::ImportFile => "IMPORT",
        InputMode::ImportSheet => "SHEET",
        InputMode::Durations => "TIMER",
    };
    let fetching = if app.fetch_receiver.is_some() {
        " ⟳ loading sheet"
    } else {
        ""
    };
    let left = Line::from(vec![
        Span::styled(
            format!(" {mode_label} "),
            Style::default()
                .fg(tokens.border_focus)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" ? help{fetching}")),
    ]);

    let Some(toast) = app.toast_message.as_deref().filter(|t| !t.is_empty()) else {
        f.render_widget(Paragraph::new(left), area);
        return;
    };

    let min_left_width = 12u16;
    let right_width =
        (UnicodeWidthStr::width(toast) as u16).min(area.width.saturating_sub(min_left_width));
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right_width)])
        .split(area);

    f.render_widget(Paragraph::new(left), chunks[0]);
    let right = Paragraph::new(Line::from(Span::styled(
        toast.to_string(),
        Style::default()
            .fg(tokens.toast)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Right);
    f.render_widget(right, chunks[1]);
}
