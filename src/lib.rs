//! # campus
//!
//! Client core for the campus course-management backend: the authenticated
//! session, the typed API client, per-resource service facades, and the
//! navigation guard that gates every route transition.
//!
//! ARCHITECTURE
//! ============
//! `session` owns the token and its derived claims. `api` wraps a pluggable
//! [`api::Transport`] with the request/response hook pair. `services` exposes
//! one facade per resource family on top of `api`. `guard` is a pure decision
//! function plus a thin applier. `context::AppContext` builds all of these
//! once and hands out shared handles.

pub mod api;
pub mod config;
pub mod context;
pub mod guard;
pub mod nav;
pub mod services;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;
