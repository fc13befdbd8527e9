use super::*;

#[test]
fn memory_get_missing_is_none() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.get_item("venues").unwrap(), None);
}

#[test]
fn memory_set_get_remove() {
    let storage = MemoryStorage::new();
    storage.set_item("venues", "[]").unwrap();
    assert_eq!(storage.get_item("venues").unwrap().as_deref(), Some("[]"));

    storage.remove_item("venues").unwrap();
    assert_eq!(storage.get_item("venues").unwrap(), None);
    // Removing again is fine.
    storage.remove_item("venues").unwrap();
}

#[test]
fn memory_keys_are_sorted() {
    let storage = MemoryStorage::new();
    storage.set_item("venues", "[]").unwrap();
    storage.set_item("event_comments", "[]").unwrap();
    assert_eq!(storage.keys().unwrap(), vec!["event_comments".to_owned(), "venues".to_owned()]);
}

#[test]
fn file_round_trips_values() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();

    assert_eq!(storage.get_item("news_articles").unwrap(), None);
    storage.set_item("news_articles", r#"[{"id":"1"}]"#).unwrap();
    assert_eq!(storage.get_item("news_articles").unwrap().as_deref(), Some(r#"[{"id":"1"}]"#));
    assert!(dir.path().join("news_articles.json").exists());
    assert!(!dir.path().join("news_articles.json.tmp").exists());
}

#[test]
fn file_open_creates_nested_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("a").join("b");
    let storage = FileStorage::open(&root).unwrap();
    assert!(root.is_dir());
    assert_eq!(storage.root(), root.as_path());
}

#[test]
fn file_keys_list_only_json_files() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();
    storage.set_item("venues", "[]").unwrap();
    storage.set_item("admin_inquiries", "[]").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    assert_eq!(storage.keys().unwrap(), vec!["admin_inquiries".to_owned(), "venues".to_owned()]);
}

#[test]
fn file_remove_missing_key_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();
    storage.remove_item("never_written").unwrap();
}

#[test]
fn file_rejects_path_like_keys() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();

    for key in ["", "../escape", "a/b", "a.b"] {
        assert!(
            matches!(storage.set_item(key, "[]"), Err(StorageError::InvalidKey(_))),
            "key {key:?} should be rejected"
        );
    }
}

#[test]
fn unavailable_fails_every_call() {
    let storage = UnavailableStorage;
    assert!(matches!(storage.get_item("k"), Err(StorageError::Unavailable)));
    assert!(matches!(storage.set_item("k", "v"), Err(StorageError::Unavailable)));
    assert!(matches!(storage.remove_item("k"), Err(StorageError::Unavailable)));
    assert!(matches!(storage.keys(), Err(StorageError::Unavailable)));
}
