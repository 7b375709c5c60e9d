use super::*;
use std::sync::{Mutex, MutexGuard, PoisonError};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// # Safety
/// Callers must hold `env_lock()` so no other test mutates the environment concurrently.
unsafe fn clear_campus_env() {
    unsafe {
        std::env::remove_var("CAMPUS_API_BASE_URL");
        std::env::remove_var("CAMPUS_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("CAMPUS_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("CAMPUS_SESSION_FILE");
        std::env::remove_var("CAMPUS_IMAGE_DIR");
    }
}

#[test]
fn from_env_uses_defaults() {
    let _guard = env_lock();
    unsafe { clear_campus_env() };

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 30, connect_secs: 10 });
    assert_eq!(cfg.session_file, PathBuf::from(DEFAULT_SESSION_FILE));
    assert!(cfg.image_cache_dir.ends_with("campus-images"));
}

#[test]
fn from_env_reads_overrides_and_trims_base_url() {
    let _guard = env_lock();
    unsafe {
        clear_campus_env();
        std::env::set_var("CAMPUS_API_BASE_URL", "https://campus.example.edu/api/");
        std::env::set_var("CAMPUS_REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("CAMPUS_CONNECT_TIMEOUT_SECS", "2");
        std::env::set_var("CAMPUS_SESSION_FILE", "/tmp/session.json");
        std::env::set_var("CAMPUS_IMAGE_DIR", "/tmp/imgs");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://campus.example.edu/api");
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 5, connect_secs: 2 });
    assert_eq!(cfg.session_file, PathBuf::from("/tmp/session.json"));
    assert_eq!(cfg.image_cache_dir, PathBuf::from("/tmp/imgs"));

    unsafe { clear_campus_env() };
}

#[test]
fn from_env_rejects_non_numeric_timeout() {
    let _guard = env_lock();
    unsafe {
        clear_campus_env();
        std::env::set_var("CAMPUS_REQUEST_TIMEOUT_SECS", "soon");
    }

    let err = ClientConfig::from_env().unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidNumber { var: "CAMPUS_REQUEST_TIMEOUT_SECS", value: "soon".to_owned() }
    );

    unsafe { clear_campus_env() };
}

#[test]
fn new_normalizes_base_url() {
    let cfg = ClientConfig::new("http://127.0.0.1:8000//");
    assert_eq!(cfg.base_url, "http://127.0.0.1:8000");
}
