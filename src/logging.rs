//! Structured logging to a file (the terminal belongs to the TUI)

use crate::error::{CatSwipeError, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "catswp=info";

/// Default log location (~/.cache/catswp/catswp.log)
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("catswp").join("catswp.log"))
}

/// Installs the global subscriber, appending to `path`.
///
/// `RUST_LOG` overrides the default filter.
pub fn init(path: &Path) -> Result<()> {
    let file = open_log_file(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| CatSwipeError::Config(format!("Failed to initialize logging: {}", e)))
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}
