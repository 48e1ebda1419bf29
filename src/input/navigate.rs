use crate::{
    actions,
    app::App,
    config::key_match,
    models::{InputMode, MoveDirection},
};
use crossterm::event::KeyEvent;

pub fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    let global = &app.config.keybindings.global;
    let board = &app.config.keybindings.board;

    // Shifted moves first: plain column bindings ignore an implicit shift.
    if key_match(&key, &board.move_left) {
        actions::move_focused_card(app, MoveDirection::Left);
    } else if key_match(&key, &board.move_right) {
        actions::move_focused_card(app, MoveDirection::Right);
    } else if key_match(&key, &global.quit) {
        app.quit();
    } else if key_match(&key, &global.help) {
        app.show_help_popup = true;
    } else if key_match(&key, &global.import_file) {
        app.open_prompt(InputMode::ImportFile);
    } else if key_match(&key, &global.import_sheet) {
        app.open_prompt(InputMode::ImportSheet);
    } else if key_match(&key, &global.durations) {
        actions::open_durations(app);
    } else if key_match(&key, &global.rewards) {
        actions::open_rewards_popup(app);
    } else if key_match(&key, &global.focus_view) {
        app.show_focus_view = true;
    } else if key_match(&key, &global.data_dir) {
        actions::open_data_dir(app);
    } else if key_match(&key, &board.up) {
        app.card_up();
    } else if key_match(&key, &board.down) {
        app.card_down();
    } else if key_match(&key, &board.column_left) {
        app.focus_column_by(MoveDirection::Left);
    } else if key_match(&key, &board.column_right) {
        app.focus_column_by(MoveDirection::Right);
    } else if key_match(&key, &board.select) {
        actions::toggle_focused_selection(app);
    } else if key_match(&key, &board.next_day) {
        app.cycle_day(true);
    } else if key_match(&key, &board.prev_day) {
        app.cycle_day(false);
    } else if key_match(&key, &board.start_timer) {
        actions::start_timer(app);
    } else if key_match(&key, &board.pause_timer) {
        app.pause_timer();
    } else if key_match(&key, &board.reset_timer) {
        app.reset_timer();
    }
}
