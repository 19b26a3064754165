use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// `~/.declscope/logs`, or `./.declscope/logs` without a home directory.
pub fn log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".declscope")
        .join("logs")
}

/// Install the global subscriber for one CLI run.
///
/// Everything at or above `RUST_LOG` (default `info`) goes to a per-day file
/// named after `component`. With `echo` set, the same events are mirrored to
/// stderr so stdout stays reserved for command output. Keep the returned
/// guard alive until exit or buffered file lines are lost.
pub fn init_logging(component: &str, echo: bool) -> WorkerGuard {
    let dir = log_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("cannot create log directory {}: {e}", dir.display());
    }

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&dir, component));

    let file = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true);
    let terminal = echo.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    let installed = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(file)
        .with(terminal)
        .try_init();
    if installed.is_err() {
        tracing::debug!("a global subscriber is already installed");
    }

    guard
}
