//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SESSION_FILE: &str = ".campus-session.json";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeouts: Timeouts,
    pub session_file: PathBuf,
    pub image_cache_dir: PathBuf,
}

impl ClientConfig {
    /// Build a config pointing at `base_url` with default timeouts and paths.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            timeouts: Timeouts::default(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            image_cache_dir: default_image_cache_dir(),
        }
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CAMPUS_API_BASE_URL`: default `http://localhost:8000`
    /// - `CAMPUS_REQUEST_TIMEOUT_SECS`: default 30
    /// - `CAMPUS_CONNECT_TIMEOUT_SECS`: default 10
    /// - `CAMPUS_SESSION_FILE`: default `./.campus-session.json`
    /// - `CAMPUS_IMAGE_DIR`: default `<tmp>/campus-images`
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout variable is set but is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("CAMPUS_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let timeouts = Timeouts {
            request_secs: env_parse_u64("CAMPUS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse_u64("CAMPUS_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let session_file = std::env::var("CAMPUS_SESSION_FILE")
            .map_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);
        let image_cache_dir = std::env::var("CAMPUS_IMAGE_DIR").map_or_else(|_| default_image_cache_dir(), PathBuf::from);

        Ok(Self { base_url: normalize_base_url(&base_url), timeouts, session_file, image_cache_dir })
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn default_image_cache_dir() -> PathBuf {
    std::env::temp_dir().join("campus-images")
}

fn env_parse_u64(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
