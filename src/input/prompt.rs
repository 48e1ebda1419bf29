use crate::{actions, app::App, config::key_match};
use crossterm::event::{KeyCode, KeyEvent};

pub fn handle_prompt_mode(app: &mut App, key: KeyEvent) {
    if key_match(&key, &app.config.keybindings.prompt.cancel) {
        app.close_prompt();
        return;
    }
    if key_match(&key, &app.config.keybindings.prompt.submit) {
        actions::submit_prompt(app);
        return;
    }
    // Single-line field: never let Enter through to the textarea.
    if key.code != KeyCode::Enter {
        app.prompt.input(key);
    }
}

pub fn handle_durations_mode(app: &mut App, key: KeyEvent) {
    let prompt = &app.config.keybindings.prompt;
    if key_match(&key, &prompt.cancel) || key_match(&key, &prompt.submit) {
        actions::close_durations(app);
        return;
    }
    if key_match(&key, &prompt.next_field) {
        app.duration_field = (app.duration_field + 1) % 2;
        return;
    }

    let field = if app.duration_field == 0 {
        &mut app.work_minutes_input
    } else {
        &mut app.break_minutes_input
    };
    match key.code {
        KeyCode::Char(c) if c.is_ascii_digit() && field.len() < 3 => field.push(c),
        KeyCode::Backspace => {
            field.pop();
        }
        _ => {}
    }
}
