// Application state module
// Immutable per-process state shared by every connection

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use crate::config::Config;

/// Application state
///
/// Captured once at startup and never mutated afterwards; in particular
/// the process working directory stays untouched per request, so two
/// concurrently handled requests always resolve against the same root.
pub struct AppState {
    pub config: Config,
    /// Canonicalized directory every request path is joined against
    pub root: PathBuf,
    /// Cached access-log flag for lock-free reads on the request path
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: Config, root: PathBuf) -> Self {
        let cached_access_log = AtomicBool::new(config.logging.access_log);
        Self {
            config,
            root,
            cached_access_log,
        }
    }
}
