//! Root application context.
//!
//! DESIGN
//! ======
//! Built once at startup and passed to whatever shell drives the client.
//! Every component receives its collaborators here; nothing reaches for a
//! global. Clone is cheap: all inner fields are `Arc`-wrapped or small.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::api::transport::{ReqwestTransport, Transport, TransportError};
use crate::config::ClientConfig;
use crate::guard::Guard;
use crate::nav::Navigator;
use crate::services::{
    courses::CourseService, enrollments::EnrollmentService, profile::ProfileService, schedules::ScheduleService,
    users::UserService,
};
use crate::session::SessionStore;
use crate::session::storage::{FileStorage, SessionStorage};

#[derive(Clone)]
pub struct AppContext {
    pub config: ClientConfig,
    pub session: Arc<SessionStore>,
    pub api: Arc<ApiClient>,
    pub guard: Guard,
    pub courses: CourseService,
    pub users: UserService,
    pub profile: ProfileService,
    pub enrollments: EnrollmentService,
    pub schedules: ScheduleService,
}

impl AppContext {
    /// Wire the production stack: reqwest transport and file-backed session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: ClientConfig, navigator: Arc<dyn Navigator>) -> Result<Self, TransportError> {
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        let storage = Arc::new(FileStorage::new(config.session_file.clone()));
        Ok(Self::with_parts(config, transport, storage, navigator))
    }

    /// Wire the context from explicit parts. The session is hydrated from
    /// `storage` immediately.
    #[must_use]
    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn SessionStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let session = Arc::new(SessionStore::new(storage, transport.clone(), navigator.clone()));
        let api = Arc::new(ApiClient::new(transport, session.clone(), navigator.clone()));

        Self {
            guard: Guard::new(session.clone(), navigator),
            courses: CourseService::new(api.clone()),
            users: UserService::new(api.clone()),
            profile: ProfileService::new(api.clone(), config.image_cache_dir.clone()),
            enrollments: EnrollmentService::new(api.clone()),
            schedules: ScheduleService::new(api.clone()),
            config,
            session,
            api,
        }
    }
}
