//! Logging: append to `xferctl.log` in the XDG state dir, or stderr when that fails.
//!
//! `RUST_LOG` overrides the default filter. Request signing logs method and
//! path only; keys and signatures never reach the log.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,xferctl_core=debug,xferctl=debug";
const LOG_FILE_NAME: &str = "xferctl.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Open (creating dir and file as needed) the console log in `dir` for appending.
fn open_log_file(dir: &Path) -> Result<(File, PathBuf)> {
    fs::create_dir_all(dir).with_context(|| format!("create log dir: {}", dir.display()))?;
    let path = dir.join(LOG_FILE_NAME);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file: {}", path.display()))?;
    Ok((file, path))
}

/// Install the file subscriber. Returns Err (nothing installed) when the
/// state dir is unusable so the caller can fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("xferctl")?;
    let (file, path) = open_log_file(&xdg_dirs.get_state_home())?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install log subscriber: {e}"))?;

    tracing::info!("xferctl logging to {}", path.display());
    Ok(())
}

/// Stderr-only logging. Never fails; a second subscriber install is ignored.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
