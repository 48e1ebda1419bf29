use crate::{
    app::{App, FinishedPeriod, PeriodOutcome},
    config::MAX_ALERT_SECONDS,
    error::AppError,
    integrations::sheets,
    models::{InputMode, MoveDirection, day_label},
};
use chrono::{Duration, Local};
use std::path::PathBuf;

fn report(app: &mut App, err: AppError) {
    if err.is_silent() {
        tracing::debug!("ignored empty import");
        return;
    }
    tracing::warn!(error = %err, "command failed");
    app.toast(err.to_string());
}

fn report_import(app: &mut App, result: Result<usize, AppError>) {
    match result {
        Ok(count) => {
            let day = app.active_day().map(day_label).unwrap_or_default();
            app.toast(format!("Imported {count} tasks. Showing {day}."));
        }
        Err(err) => report(app, err),
    }
}

pub fn submit_prompt(app: &mut App) {
    let text = app.prompt_text();
    let mode = std::mem::replace(&mut app.input_mode, InputMode::Navigate);
    if text.is_empty() {
        return;
    }
    match mode {
        InputMode::ImportFile => {
            let result = app.import_from_file(&expand_home(&text));
            report_import(app, result);
        }
        InputMode::ImportSheet => load_sheet(app, text),
        _ => {}
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(dirs) = directories::BaseDirs::new()
    {
        return dirs.home_dir().join(rest);
    }
    PathBuf::from(path)
}

pub fn load_sheet(app: &mut App, link: String) {
    if app.fetch_receiver.is_some() {
        app.toast("A sheet is already loading.");
        return;
    }
    if sheets::build_export_url(&link).is_none() {
        app.toast("Invalid Google Sheets link.");
        return;
    }
    app.toast("Fetching sheet...");
    app.fetch_receiver = Some(sheets::spawn_fetch(
        link,
        app.config.sheets.timeout_seconds,
    ));
}

/// Applies a finished download.
pub fn apply_fetched_sheet(app: &mut App, text: String) {
    let result = app.import_from_text(&text);
    report_import(app, result);
}

pub fn fetch_failed(app: &mut App, err: AppError) {
    report(app, err);
}

pub fn toggle_focused_selection(app: &mut App) {
    if let Some(id) = app.focused_card_id() {
        app.toggle_select(&id);
    }
}

pub fn move_focused_card(app: &mut App, direction: MoveDirection) {
    let Some(id) = app.focused_card_id() else {
        return;
    };
    match app.move_task(&id, direction) {
        Ok(Some(_)) => app.follow_card(&id),
        Ok(None) => {}
        Err(err) => report(app, err),
    }
}

pub fn start_timer(app: &mut App) {
    if let Err(err) = app.start_timer() {
        report(app, err);
    }
}

pub fn claim_selected_reward(app: &mut App) {
    let Some(reward) = app
        .reward_list_state
        .selected()
        .and_then(|i| app.config.rewards.get(i))
        .cloned()
    else {
        return;
    };
    match app.claim(reward.cost) {
        Ok(_) => app.toast(format!(
            "You claimed \"{}\" and spent {} points! Enjoy your break.",
            reward.name, reward.cost
        )),
        Err(err) => report(app, err),
    }
}

pub fn open_rewards_popup(app: &mut App) {
    if app.config.rewards.is_empty() {
        app.toast("No rewards configured.");
        return;
    }
    app.reward_list_state.select(Some(0));
    app.show_rewards_popup = true;
}

pub fn open_durations(app: &mut App) {
    app.duration_field = 0;
    app.input_mode = InputMode::Durations;
}

/// Normalizes the typed minutes once editing ends.
pub fn close_durations(app: &mut App) {
    let durations = app.durations();
    app.work_minutes_input = durations.work_minutes.to_string();
    app.break_minutes_input = durations.break_minutes.to_string();
    app.input_mode = InputMode::Navigate;
    app.toast(format!(
        "Work {} min / Break {} min",
        durations.work_minutes, durations.break_minutes
    ));
}

pub fn open_data_dir(app: &mut App) {
    let path = app.config.data.state_path.clone();
    if let Err(e) = crate::storage::ensure_dir(&path).and_then(|_| open::that(&path)) {
        tracing::warn!(path = ?path, error = %e, "failed to open data folder");
        app.toast(format!("Failed to open {}", path.display()));
    }
}

pub fn advance_timer(app: &mut App) {
    let Some(FinishedPeriod { outcome, saved }) = app.tick_second() else {
        return;
    };

    let message = match outcome {
        PeriodOutcome::TaskCompleted { desc, awarded } => format!(
            "Great job! \"{desc}\" is complete. +{awarded} points ({} total).",
            app.reward_points()
        ),
        PeriodOutcome::WorkEnded => "Work period over. Time for a break.".to_string(),
        PeriodOutcome::BreakEnded => "Break over. Pick a task and get back to it.".to_string(),
    };
    let alert_seconds = app.config.pomodoro.alert_seconds.clamp(1, MAX_ALERT_SECONDS) as i64;
    app.alert_message = Some(message);
    app.alert_expiry = Some(Local::now() + Duration::seconds(alert_seconds));
    if let Err(err) = saved {
        report(app, err);
    }
}
