//! File logging. The terminal belongs to the TUI, so events go to
//! `mysk.log` in the data directory.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Environment variable whose directives override the configured filter.
pub const LOG_ENV: &str = "MYSK_LOG";

/// Name of the log file inside the log directory.
pub const LOG_FILE: &str = "mysk.log";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("could not install log subscriber: {0}")]
    Init(String),
}

/// Installs the global subscriber writing to `dir/mysk.log`.
///
/// The returned guard flushes buffered events when dropped; keep it alive
/// for the life of the program.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn init(dir: &Path, filter: &str) -> Result<WorkerGuard, LoggingError> {
    let filter = build_filter(std::env::var(LOG_ENV).ok(), filter)?;
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(guard)
}

/// Uses the environment directives when they parse, otherwise `fallback`.
fn build_filter(env: Option<String>, fallback: &str) -> Result<EnvFilter, ParseError> {
    if let Some(directives) = env
        && let Ok(filter) = EnvFilter::try_new(&directives)
    {
        return Ok(filter);
    }
    EnvFilter::try_new(fallback)
}
