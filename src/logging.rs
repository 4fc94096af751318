//! Diagnostic logging.
//!
//! The terminal belongs to the form, so log events only go to a file. With
//! no file configured no subscriber is installed and events are dropped.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable naming the log file when `--log-file` is absent.
pub const LOG_FILE_ENV: &str = "ARGFORM_LOG";

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "info";

/// Picks the log file: the flag wins over the environment.
#[must_use]
pub fn log_file_path(flag: Option<&Path>) -> Option<PathBuf> {
    flag.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(LOG_FILE_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}

/// Installs a file subscriber appending to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A subscriber may already be set (tests); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();

    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins() {
        let path = log_file_path(Some(Path::new("flag.log")));
        assert_eq!(path, Some(PathBuf::from("flag.log")));
    }

    #[test]
    fn unopenable_file_is_an_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("missing").join("argform.log");
        let err = init_logging(&missing).unwrap_err();
        assert!(err.to_string().contains("Failed to open log file"));
        Ok(())
    }
}
