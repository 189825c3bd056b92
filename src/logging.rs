//! tracing setup for the CLI.
//!
//! Output goes to `<root>/logs/sessiondeck.log` so it never interleaves with
//! command output. Filtering follows `SESSION_DECK_LOG` when set.

use crate::paths;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "SESSION_DECK_LOG";

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

/// Installs the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbose: bool) {
    let file = paths::log_path().ok().and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    match file {
        Some(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter(verbose))
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter(verbose))
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
