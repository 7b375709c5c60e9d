//! Authenticated session: token, derived claims, durable persistence.
//!
//! DESIGN
//! ======
//! `SessionStore` is the only owner of the current `Session`. Role and user id
//! are never set on their own; they are always derived from a token that
//! decoded successfully, so a `Session` is either fully populated or empty.
//!
//! Commits write durable storage first and swap the in-memory value second,
//! so a failed write leaves both sides exactly as they were.

pub mod claims;
pub mod storage;


use std::sync::{Arc, PoisonError, RwLock};

use serde::Deserialize;
use serde_json::Value;

use crate::api::transport::{ApiRequest, Transport, TransportError};
use crate::nav::{LOGIN_PATH, Navigator};
pub use claims::{Claims, Role, decode};
use storage::{SessionStorage, StorageError, StoredSession};

pub const TOKEN_PATH: &str = "/token";

// =============================================================================
// SESSION
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    role: Option<Role>,
    user_id: Option<String>,
}

impl Session {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a populated session from `token`, or `None` if it does not decode.
    #[must_use]
    pub fn from_token(token: String) -> Option<Self> {
        let claims = decode(&token)?;
        Some(Self { token: Some(token), role: Some(claims.role), user_id: Some(claims.id) })
    }

    /// Rebuild a session from persisted entries. Partial records and tokens
    /// that no longer decode yield an empty session.
    #[must_use]
    pub fn from_stored(stored: StoredSession) -> Self {
        match stored {
            StoredSession { token: Some(token), user_role: Some(_), user_id: Some(_) } => {
                Self::from_token(token).unwrap_or_default()
            }
            _ => Self::empty(),
        }
    }

    #[must_use]
    pub fn to_stored(&self) -> StoredSession {
        StoredSession {
            token: self.token.clone(),
            user_role: self.role.as_ref().map(|r| r.as_str().to_owned()),
            user_id: self.user_id.clone(),
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.token.is_none()
    }
}

// =============================================================================
// LOGIN
// =============================================================================

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("login request failed: {0}")]
    Transport(#[from] TransportError),
    #[error("login rejected with status {status}")]
    Rejected { status: u16, payload: Value },
    #[error("login response has no access_token")]
    MissingAccessToken,
    #[error("access token could not be decoded")]
    InvalidToken,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

// =============================================================================
// STORE
// =============================================================================

pub struct SessionStore {
    state: RwLock<Session>,
    storage: Arc<dyn SessionStorage>,
    transport: Arc<dyn Transport>,
    navigator: Arc<dyn Navigator>,
}

impl SessionStore {
    /// Create the store and hydrate it from `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>, transport: Arc<dyn Transport>, navigator: Arc<dyn Navigator>) -> Self {
        let session = hydrate(storage.as_ref());
        Self { state: RwLock::new(session), storage, transport, navigator }
    }

    /// Copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .role
            .clone()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user_id
            .clone()
    }

    /// Decode `token`; see [`claims::decode`].
    #[must_use]
    pub fn decode(&self, token: &str) -> Option<Claims> {
        decode(token)
    }

    /// Claims of the current token, if any.
    #[must_use]
    pub fn claims(&self) -> Option<Claims> {
        self.token().as_deref().and_then(decode)
    }

    /// Exchange credentials for a token via `POST /token` (form-encoded).
    ///
    /// The session is only committed once the returned token decodes; on any
    /// failure the previous session is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend rejects the
    /// credentials, the token is missing or undecodable, or persisting fails.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, LoginError> {
        let request = ApiRequest::post(TOKEN_PATH).form(&[
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ]);
        let response = self.transport.send(request).await.map_err(|e| {
            tracing::error!(error = %e, "login request failed");
            LoginError::Transport(e)
        })?;
        if !response.is_success() {
            tracing::warn!(status = response.status, "login rejected");
            return Err(LoginError::Rejected { status: response.status, payload: response.payload() });
        }

        let body: TokenResponse =
            serde_json::from_slice(&response.body).map_err(|_| LoginError::MissingAccessToken)?;
        let Some(session) = Session::from_token(body.access_token) else {
            tracing::warn!("login returned an undecodable token");
            return Err(LoginError::InvalidToken);
        };

        self.storage.save(&session.to_stored())?;
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = session.clone();
        tracing::info!(user_id = session.user_id().unwrap_or_default(), "logged in");
        Ok(session)
    }

    /// Clear the session everywhere and send the UI to `/login`.
    /// Safe to call when already logged out.
    pub fn logout(&self) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Session::empty();
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "session storage clear failed");
        }
        tracing::info!("logged out");
        self.navigator.navigate(LOGIN_PATH);
    }
}

fn hydrate(storage: &dyn SessionStorage) -> Session {
    let stored = match storage.load() {
        Ok(Some(stored)) => stored,
        Ok(None) => return Session::empty(),
        Err(e) => {
            tracing::warn!(error = %e, "session storage unreadable; starting logged out");
            return Session::empty();
        }
    };
    let session = Session::from_stored(stored);
    if session.is_empty() {
        tracing::debug!("discarding stale session record");
        if let Err(e) = storage.clear() {
            tracing::warn!(error = %e, "session storage clear failed");
        }
    }
    session
}
