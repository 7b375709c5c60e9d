//! HTTP access layer shared by every service facade.
//!
//! DESIGN
//! ======
//! `ApiClient::send` is the single path to the backend. Each call runs the
//! same three stages in strict order:
//!
//! 1. request hook: attach `Authorization: Bearer <token>` when a session
//!    token exists;
//! 2. transport: exactly one network round trip;
//! 3. response hook: pass 2xx through; on 401 log out and request a reload
//!    before failing; unwrap other failures to the backend's error body.
//!
//! The hooks are not optional per call, so no facade can bypass them.

pub mod error;
pub mod transport;


use std::sync::Arc;

use serde::de::DeserializeOwned;

pub use error::ApiError;
use transport::{ApiRequest, ApiResponse, Transport, TransportError};

use crate::nav::Navigator;
use crate::session::SessionStore;

pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { transport, session, navigator }
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Send `request` through both hooks and return the raw 2xx response.
    ///
    /// # Errors
    ///
    /// Returns `Transport` when no response arrived, `Unauthorized` on 401
    /// (after the session has been cleared), and `Backend` for any other
    /// non-2xx status.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let request = self.before_request(request);
        let result = self.transport.send(request).await;
        self.after_response(result)
    }

    /// Like [`send`](Self::send) but decodes the 2xx body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// Same as `send`, plus `Decode` when the body does not match `T`.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        serde_json::from_slice(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn before_request(&self, request: ApiRequest) -> ApiRequest {
        match self.session.token() {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    fn after_response(&self, result: Result<ApiResponse, TransportError>) -> Result<ApiResponse, ApiError> {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "no response from backend");
                return Err(ApiError::Transport(e.0));
            }
        };
        if response.is_success() {
            return Ok(response);
        }

        let payload = response.payload();
        if response.status == 401 {
            tracing::warn!("backend rejected credentials; clearing session");
            self.session.logout();
            self.navigator.reload();
            return Err(ApiError::Unauthorized { payload });
        }
        Err(ApiError::Backend { status: response.status, payload })
    }
}
