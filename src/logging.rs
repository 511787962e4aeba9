use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "mediasearch=info";

/// Directory holding the rolling log files. The terminal belongs to the UI,
/// so nothing is logged to stdout or stderr.
pub fn log_dir() -> PathBuf {
  ProjectDirs::from("", "", "mediasearch")
    .map(|dirs| dirs.data_local_dir().join("logs"))
    .unwrap_or_else(|| std::env::temp_dir().join("mediasearch-logs"))
}

/// Install the global subscriber. Keep the guard alive for the whole run or
/// buffered lines are lost.
pub fn init() -> Result<WorkerGuard> {
  let dir = log_dir();
  std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create log directory {}", dir.display()))?;

  let appender = tracing_appender::rolling::daily(&dir, "mediasearch.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
    .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
    .try_init()
    .context("Failed to install tracing subscriber")?;

  Ok(guard)
}
