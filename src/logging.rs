/*!
 * Logging and tracing initialization
 *
 * Diagnostics come up before configuration is loaded (a config failure has
 * to land somewhere), so this module reads only its own environment knobs:
 * `RUST_LOG` for the filter and `HYGROLOG_LOG` for an optional log file.
 */

use std::fs::File;
use std::path::{Path, PathBuf};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::error::{HygroError, Result};

/// Environment variable naming an optional log file (JSON lines)
pub const LOG_FILE_ENV_VAR: &str = "HYGROLOG_LOG";

const DEFAULT_FILTER: &str = "hygrolog=info";

/// Initialize structured logging
pub fn init_logging() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| HygroError::Config(format!("Failed to create log filter: {}", e)))?;

    if let Some(log_path) = std::env::var_os(LOG_FILE_ENV_VAR).map(PathBuf::from) {
        init_file_logging(&log_path, env_filter)?;
    } else {
        init_stdout_logging(env_filter);
    }

    Ok(())
}

/// Initialize logging to stdout/stderr
fn init_stdout_logging(env_filter: EnvFilter) {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Initialize logging to a file
fn init_file_logging(log_path: &Path, env_filter: EnvFilter) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|e| HygroError::Config(format!("Failed to open log file: {}", e)))?;

    let fmt_layer = fmt::layer()
        .with_writer(file)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_ansi(false) // No ANSI colors in file
        .json();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}

/// Initialize logging with custom format for testing
#[cfg(test)]
pub fn init_test_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hygrolog=debug"));

        let fmt_layer = fmt::layer().with_test_writer().with_target(false).compact();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .ok(); // Ignore error if already initialized
    });
}
