use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "taskboard.log";

/// Sends `tracing` output to a file next to the saved state. The terminal
/// belongs to the UI, so nothing goes to stderr. `RUST_LOG` overrides the
/// `info` default.
///
/// Keep the returned guard alive for the whole run or buffered lines are lost.
pub fn init(data_dir: &Path) -> Option<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(data_dir) {
        eprintln!("Failed to create {}: {e}", data_dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::never(data_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    if installed.is_err() {
        return None;
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "taskboard starting");
    Some(guard)
}
