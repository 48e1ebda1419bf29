use crossterm::{
    event, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::{error::Error, io, time::Duration};

mod actions;
mod app;
mod board;
mod config;
mod error;
mod importer;
mod integrations;
mod input;
mod logging;
mod models;
mod pomodoro;
mod runtime;
mod storage;
mod ui;

use app::App;

fn main() -> Result<(), Box<dyn Error>> {
    let config = config::Config::load();
    let _log_guard = logging::init(&config.data.state_path);
    for warning in &config.load_warnings {
        tracing::warn!("{warning}");
    }
    let mut app = App::new(config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "event loop failed");
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        runtime::tick(app);

        terminal.draw(|f| ui::ui(f, app))?;

        if event::poll(Duration::from_millis(200))? {
            input::handle_event(app, event::read()?);
        }

        if app.should_quit {
            tracing::info!("quitting");
            return Ok(());
        }
    }
}
