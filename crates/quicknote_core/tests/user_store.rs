use quicknote_core::{CredentialStore, JsonCredentialStore, StoreError, UserRecord};
use std::fs;

#[test]
fn load_returns_empty_list_when_file_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonCredentialStore::in_dir(dir.path());

    assert!(store.load().unwrap().is_empty());
    assert!(!store.path().exists());
}

#[test]
fn save_then_load_preserves_order_and_content() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonCredentialStore::in_dir(dir.path());
    let records = vec![
        UserRecord::new("alice", "secret1").unwrap(),
        UserRecord::new("bob", "hunter2").unwrap(),
    ];

    store.save(&records).unwrap();
    assert_eq!(store.load().unwrap(), records);
}

#[test]
fn saved_file_is_pretty_printed_array_with_non_ascii_kept() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonCredentialStore::in_dir(dir.path());
    let record = UserRecord::new("người dùng", "mật khẩu").unwrap();
    store.save(std::slice::from_ref(&record)).unwrap();

    let text = fs::read_to_string(store.path()).unwrap();
    let expected = format!(
        "[\n    {{\n        \"username\": \"người dùng\",\n        \"password\": \"{}\"\n    }}\n]",
        record.password_hash
    );
    assert_eq!(text, expected);
}

#[test]
fn save_overwrites_previous_content() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonCredentialStore::in_dir(dir.path());

    store
        .save(&[UserRecord::new("alice", "a").unwrap()])
        .unwrap();
    store.save(&[UserRecord::new("bob", "b").unwrap()]).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].username, "bob");
}

#[test]
fn load_rejects_file_that_is_not_json() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonCredentialStore::in_dir(dir.path());
    fs::write(store.path(), "username=alice").unwrap();

    let err = store.load().unwrap_err();
    assert!(matches!(err, StoreError::Malformed { .. }));
}

#[test]
fn load_rejects_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonCredentialStore::in_dir(dir.path());
    fs::write(store.path(), "").unwrap();

    assert!(matches!(
        store.load().unwrap_err(),
        StoreError::Malformed { .. }
    ));
}

#[test]
fn load_rejects_records_with_missing_fields() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonCredentialStore::in_dir(dir.path());
    fs::write(store.path(), r#"[{"username": "alice"}]"#).unwrap();

    assert!(matches!(
        store.load().unwrap_err(),
        StoreError::Malformed { .. }
    ));
}

#[test]
fn load_rejects_duplicate_usernames_and_bad_digests() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonCredentialStore::in_dir(dir.path());
    let digest = UserRecord::new("x", "pw").unwrap().password_hash;

    let duplicated = serde_json::json!([
        {"username": "alice", "password": digest.as_str()},
        {"username": "alice", "password": digest.as_str()},
    ]);
    fs::write(store.path(), duplicated.to_string()).unwrap();
    assert!(matches!(
        store.load().unwrap_err(),
        StoreError::InvalidData(_)
    ));

    let bad_digest = serde_json::json!([{"username": "alice", "password": "plaintext"}]);
    fs::write(store.path(), bad_digest.to_string()).unwrap();
    assert!(matches!(
        store.load().unwrap_err(),
        StoreError::InvalidData(_)
    ));
}

#[test]
fn save_rejects_duplicate_records_without_touching_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonCredentialStore::in_dir(dir.path());
    let alice = UserRecord::new("alice", "a").unwrap();

    let err = store.save(&[alice.clone(), alice]).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
    assert!(!store.path().exists());
}

#[test]
fn save_reports_io_error_when_target_is_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("users.json");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("keep"), "x").unwrap();
    let store = JsonCredentialStore::new(&target);

    let err = store
        .save(&[UserRecord::new("alice", "a").unwrap()])
        .unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
}
