//! Navigation side effects requested by the session store, the API client
//! and the guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! The core never drives a UI directly. A shell (browser router, CLI, test
//! harness) implements `Navigator` and decides what "go to /login" and
//! "reload" mean for it.

pub const LOGIN_PATH: &str = "/login";

pub trait Navigator: Send + Sync {
    /// Move the UI to `path`.
    fn navigate(&self, path: &str);

    /// Drop all in-memory UI state and start over from the persisted session.
    fn reload(&self);
}

/// Navigator for headless shells: records each request in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, path: &str) {
        tracing::info!(%path, "navigate");
    }

    fn reload(&self) {
        tracing::info!("reload requested");
    }
}
