//! Per-navigation authorization gate.
//!
//! DESIGN
//! ======
//! `decide` is a pure function of the destination's metadata, the current
//! session and the clock. It never mutates anything; `Guard::navigate`
//! applies the decision (logout, redirect, or move on).
//!
//! Evaluation order:
//! 1. no token / undecodable token: redirect to `/login` with logout, unless
//!    already heading to `/login`;
//! 2. expired token: redirect to `/login` with logout;
//! 3. route requires auth but no token: redirect to `/login`;
//! 4. route restricts roles and the token's role is not listed: deny;
//! 5. otherwise allow.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::nav::{LOGIN_PATH, Navigator};
use crate::session::{Session, SessionStore, decode};

// =============================================================================
// ROUTES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    /// Role names allowed on this route; empty means any role.
    pub allowed_roles: &'static [&'static str],
    /// Static alias resolved before the guard runs.
    pub redirect: Option<&'static str>,
}

impl RouteMeta {
    const fn public() -> Self {
        Self { requires_auth: false, allowed_roles: &[], redirect: None }
    }

    const fn authenticated() -> Self {
        Self { requires_auth: true, allowed_roles: &[], redirect: None }
    }

    const fn admin_only() -> Self {
        Self { requires_auth: true, allowed_roles: &["admin"], redirect: None }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub path: &'static str,
    pub meta: RouteMeta,
}

pub const ROUTES: &[Route] = &[
    Route { path: "/", meta: RouteMeta { requires_auth: false, allowed_roles: &[], redirect: Some(LOGIN_PATH) } },
    Route { path: "/dashboard", meta: RouteMeta::authenticated() },
    Route { path: LOGIN_PATH, meta: RouteMeta::public() },
    Route { path: "/courses", meta: RouteMeta::authenticated() },
    Route { path: "/admin/register", meta: RouteMeta::admin_only() },
    Route { path: "/profile", meta: RouteMeta::authenticated() },
    Route { path: "/enrollment", meta: RouteMeta::admin_only() },
    Route { path: "/schedule", meta: RouteMeta::authenticated() },
    Route { path: "/chatbot", meta: RouteMeta::authenticated() },
    Route { path: "/test", meta: RouteMeta::public() },
];

/// Metadata for `path`. Unknown paths require authentication.
#[must_use]
pub fn lookup(path: &str) -> RouteMeta {
    ROUTES
        .iter()
        .find(|r| r.path == path)
        .map_or(RouteMeta::authenticated(), |r| r.meta)
}

// =============================================================================
// DECISION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Go to `path` instead. When `logout` is set the session must be
    /// cleared first.
    RedirectTo { path: String, logout: bool },
    /// Authenticated but not permitted; stay where you are.
    Deny,
}

impl Decision {
    fn login_redirect(logout: bool) -> Self {
        Self::RedirectTo { path: LOGIN_PATH.to_owned(), logout }
    }
}

/// Decide whether navigation to `path` may proceed.
#[must_use]
pub fn decide(path: &str, meta: &RouteMeta, session: &Session, now_secs: i64) -> Decision {
    let token = session.token();
    let Some(claims) = token.and_then(decode) else {
        if path != LOGIN_PATH {
            return Decision::login_redirect(true);
        }
        return Decision::Allow;
    };

    if claims.is_expired_at(now_secs) {
        return Decision::login_redirect(true);
    }

    if meta.requires_auth && token.is_none() {
        return Decision::login_redirect(false);
    }

    if !meta.allowed_roles.is_empty() && !meta.allowed_roles.contains(&claims.role.as_str()) {
        return Decision::Deny;
    }

    Decision::Allow
}

// =============================================================================
// APPLIER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Arrived(String),
    Redirected(String),
    Denied,
}

#[derive(Clone)]
pub struct Guard {
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl Guard {
    #[must_use]
    pub fn new(session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    /// Run the guard for `path` against the current time and apply the result.
    pub fn navigate(&self, path: &str) -> NavigationOutcome {
        self.navigate_at(path, now_secs())
    }

    /// Same as [`navigate`](Self::navigate) with an explicit clock.
    pub fn navigate_at(&self, path: &str, now_secs: i64) -> NavigationOutcome {
        let target = lookup(path).redirect.unwrap_or(path);
        let meta = lookup(target);

        match decide(target, &meta, &self.session.snapshot(), now_secs) {
            Decision::Allow => {
                self.navigator.navigate(target);
                NavigationOutcome::Arrived(target.to_owned())
            }
            Decision::RedirectTo { path, logout } => {
                tracing::info!(from = %target, to = %path, logout, "navigation redirected");
                if logout {
                    // logout() already moves the UI to /login.
                    self.session.logout();
                } else {
                    self.navigator.navigate(&path);
                }
                NavigationOutcome::Redirected(path)
            }
            Decision::Deny => {
                tracing::warn!(path = %target, role = ?self.session.role(), "navigation denied");
                NavigationOutcome::Denied
            }
        }
    }
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}
