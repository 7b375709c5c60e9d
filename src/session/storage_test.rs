use super::*;

fn sample() -> StoredSession {
    StoredSession {
        token: Some("h.p.s".to_owned()),
        user_role: Some("admin".to_owned()),
        user_id: Some("7".to_owned()),
    }
}

#[test]
fn file_storage_load_missing_file_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("session.json"));
    assert!(storage.load().unwrap().is_none());
}

#[test]
fn file_storage_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("nested").join("session.json"));
    storage.save(&sample()).unwrap();
    assert_eq!(storage.load().unwrap(), Some(sample()));
}

#[test]
fn file_storage_uses_browser_key_names() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("session.json"));
    storage.save(&sample()).unwrap();

    let raw = std::fs::read_to_string(storage.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["token"], "h.p.s");
    assert_eq!(value["userRole"], "admin");
    assert_eq!(value["userId"], "7");
}

#[test]
fn file_storage_clear_removes_file_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("session.json"));
    storage.save(&sample()).unwrap();
    storage.clear().unwrap();
    assert!(!storage.path().exists());
    storage.clear().unwrap();
}

#[test]
fn file_storage_rejects_corrupt_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{ not json").unwrap();
    let storage = FileStorage::new(path);
    assert!(matches!(storage.load(), Err(StorageError::Json(_))));
}

#[test]
fn file_storage_loads_partial_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, r#"{"token":"h.p.s"}"#).unwrap();
    let loaded = FileStorage::new(path).load().unwrap().unwrap();
    assert_eq!(loaded.token.as_deref(), Some("h.p.s"));
    assert!(loaded.user_role.is_none());
}

#[test]
fn memory_storage_round_trip_and_clear() {
    let storage = MemoryStorage::new();
    assert!(storage.load().unwrap().is_none());
    storage.save(&sample()).unwrap();
    assert_eq!(storage.load().unwrap(), Some(sample()));
    storage.clear().unwrap();
    assert!(storage.load().unwrap().is_none());
}

#[cfg(unix)]
#[test]
fn file_storage_session_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("session.json"));
    storage.save(&sample()).unwrap();

    let mode = std::fs::metadata(storage.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn file_storage_overwrite_leaves_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("session.json"));
    storage.save(&sample()).unwrap();
    let mut updated = sample();
    updated.user_id = Some("8".to_owned());
    storage.save(&updated).unwrap();

    assert_eq!(storage.load().unwrap(), Some(updated));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}
