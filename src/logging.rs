//! Logging configuration using tracing with file appender.
//!
//! The interactive shell owns the terminal, so logs always go to a file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Default log file name, created in the working directory.
pub const DEFAULT_LOG_FILE: &str = "snipview.log";

/// Filter used when the requested level does not parse.
pub const FALLBACK_FILTER: &str = "snipview=info";

/// Directive limiting output to this crate at `level`.
///
/// Dependencies (tuirealm, crossterm) stay silent even when the level is
/// invalid.
pub fn crate_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(format!("snipview={level}"))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

/// Initialize tracing with file output.
///
/// Returns a guard that must be held for the duration of the program to ensure
/// logs are flushed. Dropping the guard flushes remaining logs.
///
/// In debug builds, span enter/exit events are logged for detailed tracing.
pub fn init_logging(log_path: Option<&Path>, level: Option<&str>) -> WorkerGuard {
    let log_path = log_path.unwrap_or(Path::new(DEFAULT_LOG_FILE));
    let level = level.unwrap_or("info");

    let parent = log_path.parent().unwrap_or(Path::new("."));
    let filename = log_path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new(DEFAULT_LOG_FILE));

    let file_appender = tracing_appender::rolling::never(parent, filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = crate_filter(level);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false);

    #[cfg(debug_assertions)]
    let file_layer = {
        use tracing_subscriber::fmt::format::FmtSpan;
        file_layer.with_span_events(FmtSpan::ENTER | FmtSpan::CLOSE)
    };

    // A second init (tests, embedding hosts) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();

    tracing::info!(
        log_file = %log_path.display(),
        level,
        version = env!("CARGO_PKG_VERSION"),
        "snipview logging started"
    );

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_targets_this_crate() {
        assert_eq!(crate_filter("debug").to_string(), "snipview=debug");
    }

    #[test]
    fn invalid_level_falls_back_to_crate_info() {
        assert_eq!(crate_filter("loud").to_string(), FALLBACK_FILTER);
    }
}
