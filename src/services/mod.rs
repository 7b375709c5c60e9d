//! Resource facades over `ApiClient`.
//!
//! ARCHITECTURE
//! ============
//! One facade per resource family. Each operation issues exactly one HTTP
//! call, decodes the payload into a local type, and applies that endpoint's
//! failure policy: propagate, treat 404 as "no results", or fold the failure
//! into a result object. Failures that propagate are logged here first.

pub mod courses;
pub mod enrollments;
pub mod profile;
pub mod schedules;
pub mod users;

use crate::api::ApiError;

/// Map a 404 from a search-style endpoint to an empty result set.
fn empty_on_not_found<T>(result: Result<Vec<T>, ApiError>, what: &str) -> Result<Vec<T>, ApiError> {
    match result {
        Err(e) if e.is_not_found() => {
            tracing::debug!(%what, "no matches");
            Ok(Vec::new())
        }
        Err(e) => {
            tracing::error!(error = %e, %what, "search failed");
            Err(e)
        }
        ok => ok,
    }
}
