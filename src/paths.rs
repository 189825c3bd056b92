//! Centralized home-based storage paths for session-deck.
//!
//! Everything the front end persists lives under `~/.session-deck/`:
//! - `config.yaml` - client configuration
//! - `logs/sessiondeck.log` - tracing output
//!
//! `SESSION_DECK_HOME` replaces the whole root, which tests rely on.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// The name of the session-deck directory under the user's home.
const SESSION_DECK_DIR: &str = ".session-deck";

/// Environment variable overriding the storage root.
pub const HOME_ENV: &str = "SESSION_DECK_HOME";

/// Returns the storage root: `$SESSION_DECK_HOME` or `~/.session-deck/`.
///
/// Creates the directory if it doesn't exist.
///
/// # Errors
///
/// Returns an error if:
/// - Home directory cannot be determined
/// - Directory creation fails
pub fn session_deck_home_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os(HOME_ENV) {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => dirs::home_dir()
            .context("Could not determine home directory for session-deck storage")?
            .join(SESSION_DECK_DIR),
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create session-deck directory: {}", dir.display()))?;
    Ok(dir)
}

/// Returns the default config path: `<root>/config.yaml`
pub fn config_path() -> Result<PathBuf> {
    Ok(session_deck_home_dir()?.join("config.yaml"))
}

/// Returns the logs directory: `<root>/logs/`
///
/// Creates the directory if it doesn't exist.
pub fn logs_dir() -> Result<PathBuf> {
    let dir = session_deck_home_dir()?.join("logs");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create logs directory: {}", dir.display()))?;
    Ok(dir)
}

/// Returns the log file path: `<root>/logs/sessiondeck.log`
pub fn log_path() -> Result<PathBuf> {
    Ok(logs_dir()?.join("sessiondeck.log"))
}

#[cfg(test)]
#[path = "tests/paths_tests.rs"]
mod tests;
