pub(crate) mod navigate;
pub(crate) mod popups;
pub(crate) mod prompt;

use crate::{app::App, models::InputMode};
use crossterm::event::{Event, KeyEventKind};

pub fn handle_event(app: &mut App, event: Event) {
    let Event::Key(key) = event else {
        return;
    };
    if key.kind != KeyEventKind::Press {
        return;
    }
    if popups::handle_popup_events(app, key) {
        return;
    }
    match app.input_mode {
        InputMode::Navigate => navigate::handle_normal_mode(app, key),
        InputMode::ImportFile | InputMode::ImportSheet => prompt::handle_prompt_mode(app, key),
        InputMode::Durations => prompt::handle_durations_mode(app, key),
    }
}
