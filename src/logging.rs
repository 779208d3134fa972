//! Log to a file; the terminal belongs to the UI.

use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter, e.g. `blogtui=debug`
pub const LOG_ENV: &str = "BLOGTUI_LOG";

const DEFAULT_FILTER: &str = "info";

/// Directory for the log file: `$XDG_DATA_HOME/blogtui`, or the working
/// directory if there is no data dir.
pub fn log_dir() -> PathBuf {
  dirs::data_dir()
    .map(|d| d.join("blogtui"))
    .unwrap_or_else(|| PathBuf::from("."))
}

/// Install the global subscriber writing to `<log_dir>/blogtui.log`.
///
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init() -> Result<WorkerGuard> {
  let dir = log_dir();
  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::never(&dir, "blogtui.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::registry()
    .with(filter_from(std::env::var(LOG_ENV).ok().as_deref()))
    .with(fmt::layer().with_writer(writer).with_ansi(false))
    .try_init()
    .map_err(|e| eyre!("Failed to install log subscriber: {}", e))?;

  Ok(guard)
}

/// Parse a filter directive, falling back to `info` when absent or invalid
fn filter_from(directive: Option<&str>) -> EnvFilter {
  directive
    .and_then(|d| EnvFilter::try_new(d).ok())
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_filter_defaults_to_info() {
    assert_eq!(filter_from(None).to_string(), "info");
  }

  #[test]
  fn test_filter_uses_directive() {
    assert_eq!(filter_from(Some("blogtui=debug")).to_string(), "blogtui=debug");
  }

  #[test]
  fn test_log_dir_ends_with_app_name() {
    let dir = log_dir();
    assert!(dir.ends_with("blogtui") || dir == PathBuf::from("."));
  }
}
