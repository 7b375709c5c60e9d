//! Current user's profile and avatar image.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::transport::{ApiRequest, ApiResponse};
use crate::api::{ApiClient, ApiError};

/// Placeholder shown whenever the avatar cannot be fetched.
pub const FALLBACK_IMAGE: &str = "/default-profile.png";

const IMAGE_EXTENSIONS: &[&str] = &["png", "gif", "webp", "jpg"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub department_code: String,
    pub date_of_enrollment: String,
}

#[derive(Clone)]
pub struct ProfileService {
    api: Arc<ApiClient>,
    image_dir: PathBuf,
}

impl ProfileService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>, image_dir: PathBuf) -> Self {
        Self { api, image_dir }
    }

    /// `GET /profile` for the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` without calling the backend when logged out;
    /// otherwise propagates any `ApiError` after logging it.
    pub async fn profile(&self) -> Result<Profile, ApiError> {
        if self.api.session().token().is_none() {
            tracing::error!("profile requested without a session");
            return Err(ApiError::MissingToken);
        }
        self.api
            .send_json(ApiRequest::get("/profile"))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "profile fetch failed"))
    }

    /// Fetch the avatar, store it under the image cache directory and return
    /// a `file://` URL to it. Never fails: any problem yields
    /// [`FALLBACK_IMAGE`].
    pub async fn image(&self) -> String {
        let Some(user_id) = self.api.session().user_id() else {
            tracing::warn!("avatar requested without a session");
            return FALLBACK_IMAGE.to_owned();
        };
        match self.fetch_image(&user_id).await {
            Ok(path) => format!("file://{}", path.display()),
            Err(e) => {
                tracing::error!(error = %e, %user_id, "avatar fetch failed");
                FALLBACK_IMAGE.to_owned()
            }
        }
    }

    async fn fetch_image(&self, user_id: &str) -> Result<PathBuf, ImageError> {
        let key = urlencoding::encode(user_id).into_owned();
        let response = self.api.send(ApiRequest::get(format!("/image/{key}"))).await?;
        if response.body.is_empty() {
            return Err(ImageError::Empty);
        }
        let dir = self.image_dir.clone();
        let extension = image_extension(&response);
        let body = response.body;
        tokio::task::spawn_blocking(move || store_image(&dir, &key, extension, &body)).await?
    }
}

/// Write `<dir>/<key>.<extension>` atomically and drop any copy of the same
/// key cached under another extension, so each user has at most one file.
fn store_image(dir: &Path, key: &str, extension: &str, body: &[u8]) -> Result<PathBuf, ImageError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{key}.{extension}"));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(body)?;
    tmp.persist(&path).map_err(|e| e.error)?;

    for stale in IMAGE_EXTENSIONS.iter().filter(|ext| **ext != extension) {
        match std::fs::remove_file(dir.join(format!("{key}.{stale}"))) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(error = %e, %key, "stale avatar cleanup failed"),
        }
    }
    Ok(path)
}

#[derive(Debug, thiserror::Error)]
enum ImageError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("image cache write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("image body is empty")]
    Empty,
    #[error("image cache task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

fn image_extension(response: &ApiResponse) -> &'static str {
    match response.content_type.as_deref().map(|ct| ct.split(';').next().unwrap_or(ct).trim()) {
        Some("image/png") => "png",
        Some("image/gif") => "gif",
        Some("image/webp") => "webp",
        _ => "jpg",
    }
}
