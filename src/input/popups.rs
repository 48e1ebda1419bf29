use crate::{actions, app::App, config::key_match};
use crossterm::event::{KeyCode, KeyEvent};

/// Returns true when a popup consumed the key.
pub fn handle_popup_events(app: &mut App, key: KeyEvent) -> bool {
    // The completion alert swallows everything until it expires.
    if app.alert_message.is_some() {
        return true;
    }
    if app.show_help_popup {
        if key.code == KeyCode::Esc || key_match(&key, &app.config.keybindings.global.help) {
            app.show_help_popup = false;
        }
        return true;
    }
    if app.show_rewards_popup {
        handle_rewards_popup(app, key);
        return true;
    }
    if app.show_focus_view {
        handle_focus_view(app, key);
        return true;
    }
    false
}

fn handle_rewards_popup(app: &mut App, key: KeyEvent) {
    let popup = &app.config.keybindings.popup;
    if key_match(&key, &popup.cancel) || key_match(&key, &app.config.keybindings.global.rewards) {
        app.show_rewards_popup = false;
    } else if key_match(&key, &popup.confirm) {
        actions::claim_selected_reward(app);
    } else if key_match(&key, &popup.up) {
        let i = app.reward_list_state.selected().unwrap_or(0);
        app.reward_list_state.select(Some(i.saturating_sub(1)));
    } else if key_match(&key, &popup.down) {
        let last = app.config.rewards.len().saturating_sub(1);
        let i = app.reward_list_state.selected().unwrap_or(0);
        app.reward_list_state.select(Some((i + 1).min(last)));
    }
}

/// Timer keys stay live in the focus view. Esc or the toggle key closes it.
fn handle_focus_view(app: &mut App, key: KeyEvent) {
    let board = &app.config.keybindings.board;
    if key_match(&key, &board.start_timer) {
        actions::start_timer(app);
    } else if key_match(&key, &board.pause_timer) {
        app.pause_timer();
    } else if key_match(&key, &board.reset_timer) {
        app.reset_timer();
    } else if key.code == KeyCode::Esc
        || key_match(&key, &app.config.keybindings.global.focus_view)
        || key_match(&key, &app.config.keybindings.popup.cancel)
    {
        app.show_focus_view = false;
    }
}
