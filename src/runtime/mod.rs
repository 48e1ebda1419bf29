use crate::{actions, app::App};
use chrono::{Duration, Local};
use std::sync::mpsc::TryRecvError;

pub fn tick(app: &mut App) {
    handle_day_rollover(app);
    handle_sheet_fetch(app);
    handle_timer(app);

    if let Some(expiry) = app.alert_expiry
        && Local::now() >= expiry
    {
        app.alert_expiry = None;
        app.alert_message = None;
    }

    if let Some(expiry) = app.toast_expiry
        && Local::now() >= expiry
    {
        app.toast_expiry = None;
        app.toast_message = None;
    }
}

/// Catches up on every whole second that passed since the last frame.
fn handle_timer(app: &mut App) {
    let now = Local::now();
    while let Some(due) = app.next_tick
        && now >= due
    {
        app.next_tick = Some(due + Duration::seconds(1));
        actions::advance_timer(app);
        if !app.timer().is_running() {
            app.next_tick = None;
        }
    }
}

fn handle_sheet_fetch(app: &mut App) {
    let result = {
        let Some(receiver) = app.fetch_receiver.as_ref() else {
            return;
        };
        receiver.try_recv()
    };

    match result {
        Ok(Ok(text)) => {
            app.fetch_receiver = None;
            actions::apply_fetched_sheet(app, text);
        }
        Ok(Err(err)) => {
            app.fetch_receiver = None;
            actions::fetch_failed(app, err.into());
        }
        Err(TryRecvError::Empty) => {}
        Err(TryRecvError::Disconnected) => {
            app.fetch_receiver = None;
            app.toast("Sheet download stopped.");
        }
    }
}

fn handle_day_rollover(app: &mut App) {
    let today = Local::now().date_naive();
    if today == app.active_date {
        return;
    }
    if app.roll_over_day(today) {
        let day = app
            .active_day()
            .map(crate::models::day_label)
            .unwrap_or_default();
        tracing::info!(%today, "new day, switched board");
        app.toast(format!("New day detected: showing {day}."));
    }
}
