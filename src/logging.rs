//! Diagnostics log.
//!
//! The terminal is in raw mode while the UI runs, so events go to
//! `dynatail.log` in the data directory instead of stderr.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV_VAR: &str = "DYNATAIL_LOG";

pub const LOG_FILE: &str = "dynatail.log";

/// Directives used when `DYNATAIL_LOG` is unset.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "dynatail=info"
    } else {
        "off"
    }
}

fn build_filter(env_value: Option<String>, verbose: bool) -> EnvFilter {
    env_value
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directives(verbose)))
}

/// Install the global subscriber, appending to `<dir>/dynatail.log`.
///
/// Returns the log path, or `None` when logging is disabled.
pub fn init(dir: Option<&Path>, verbose: bool) -> Result<Option<PathBuf>> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    if env_value.is_none() && !verbose {
        return Ok(None);
    }
    let Some(dir) = dir else {
        return Ok(None);
    };

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(env_value, verbose))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;

    Ok(Some(path))
}
