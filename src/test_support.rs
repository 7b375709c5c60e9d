//! Shared test doubles: a scripted transport, a recording navigator, and
//! token builders.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;

use crate::api::transport::{ApiRequest, ApiResponse, Transport, TransportError};
use crate::config::ClientConfig;
use crate::context::AppContext;
use crate::nav::Navigator;
use crate::session::storage::{MemoryStorage, SessionStorage, StoredSession};

/// Token whose middle segment is `claims`, shaped like the backend's JWTs.
pub fn token_with(claims: &Value) -> String {
    format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", URL_SAFE_NO_PAD.encode(claims.to_string()))
}

pub fn token_for(role: &str, id: &str, exp: i64) -> String {
    token_with(&serde_json::json!({ "role": role, "id": id, "exp": exp }))
}

/// Far-future admin token for user `7`.
pub fn admin_token() -> String {
    token_for("admin", "7", 9_999_999_999)
}

pub fn stored(token: &str, role: &str, id: &str) -> StoredSession {
    StoredSession { token: Some(token.to_owned()), user_role: Some(role.to_owned()), user_id: Some(id.to_owned()) }
}

// =========================================================================
// MockTransport
// =========================================================================

#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, response: ApiResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_json(&self, status: u16, value: Value) {
        self.push(ApiResponse::json(status, &value));
    }

    pub fn push_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(TransportError(message.to_owned())));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request sent")
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted response".to_owned())))
    }
}

// =========================================================================
// RecordingNavigator
// =========================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    Navigate(String),
    Reload,
}

#[derive(Default)]
pub struct RecordingNavigator {
    events: Mutex<Vec<NavEvent>>,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<NavEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn reloads(&self) -> usize {
        self.events().iter().filter(|e| **e == NavEvent::Reload).count()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.events.lock().unwrap().push(NavEvent::Navigate(path.to_owned()));
    }

    fn reload(&self) {
        self.events.lock().unwrap().push(NavEvent::Reload);
    }
}

// =========================================================================
// Harness
// =========================================================================

pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub navigator: Arc<RecordingNavigator>,
    pub storage: Arc<MemoryStorage>,
    pub ctx: AppContext,
    /// Backs `ctx.config.image_cache_dir`; removed on drop.
    pub image_dir: tempfile::TempDir,
}

impl Harness {
    /// Context with no persisted session.
    pub fn logged_out() -> Self {
        Self::with_storage(MemoryStorage::new())
    }

    /// Context hydrated with an admin session for user `7`.
    pub fn logged_in() -> Self {
        let token = admin_token();
        Self::with_storage(MemoryStorage::with_entries(stored(&token, "admin", "7")))
    }

    pub fn with_storage(storage: MemoryStorage) -> Self {
        let transport = MockTransport::new();
        let navigator = RecordingNavigator::new();
        let storage = Arc::new(storage);
        let mut config = ClientConfig::new("http://backend.test");
        let image_dir = tempfile::tempdir().expect("image cache tempdir");
        config.image_cache_dir = image_dir.path().join("images");
        let ctx = AppContext::with_parts(
            config,
            transport.clone(),
            storage.clone() as Arc<dyn SessionStorage>,
            navigator.clone(),
        );
        Self { transport, navigator, storage, ctx, image_dir }
    }
}
