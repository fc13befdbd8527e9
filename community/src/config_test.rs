use std::sync::{Mutex, MutexGuard, PoisonError};

use super::*;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that touch process env.
fn env_guard() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// # Safety
/// Callers must hold [`env_guard`] to avoid env races.
unsafe fn clear_vb_env() {
    unsafe {
        std::env::remove_var("VB_STORAGE");
        std::env::remove_var("VB_DATA_DIR");
        std::env::remove_var("VB_CLEAR_CORRUPT");
        std::env::remove_var("VB_SEED_EVENTS");
    }
}

#[test]
fn from_env_defaults() {
    let _guard = env_guard();
    unsafe { clear_vb_env() };

    let cfg = CommunityConfig::from_env().unwrap();
    assert_eq!(cfg, CommunityConfig::default());
    assert_eq!(cfg.backend, StorageBackend::File);
    assert_eq!(cfg.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
    assert!(cfg.clear_corrupt);
    assert!(cfg.seed_events);
}

#[test]
fn from_env_parses_overrides() {
    let _guard = env_guard();
    unsafe {
        clear_vb_env();
        std::env::set_var("VB_STORAGE", "memory");
        std::env::set_var("VB_DATA_DIR", "/tmp/vb-data");
        std::env::set_var("VB_CLEAR_CORRUPT", "off");
        std::env::set_var("VB_SEED_EVENTS", "FALSE");
    }

    let cfg = CommunityConfig::from_env().unwrap();
    assert_eq!(cfg.backend, StorageBackend::Memory);
    assert_eq!(cfg.data_dir, PathBuf::from("/tmp/vb-data"));
    assert!(!cfg.clear_corrupt);
    assert!(!cfg.seed_events);

    unsafe { clear_vb_env() };
}

#[test]
fn parse_backend_rejects_unknown() {
    let err = parse_backend(Some("redis")).unwrap_err();
    assert!(err.to_string().contains("unknown VB_STORAGE"));
}

#[test]
fn parse_bool_rejects_garbage() {
    let err = parse_bool("VB_SEED_EVENTS", Some("maybe"), true).unwrap_err();
    assert_eq!(err.to_string(), "invalid boolean for VB_SEED_EVENTS: maybe");
    assert!(parse_bool("VB_SEED_EVENTS", None, true).unwrap());
    assert!(parse_bool("VB_SEED_EVENTS", Some(" Yes "), false).unwrap());
}

#[test]
fn open_store_creates_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = CommunityConfig { data_dir: dir.path().join("data"), ..CommunityConfig::default() };

    let store = cfg.open_store().unwrap();
    assert!(dir.path().join("data").is_dir());
    assert!(store.options().clear_corrupt);
}

#[test]
fn open_store_memory_carries_options() {
    let cfg = CommunityConfig { backend: StorageBackend::Memory, clear_corrupt: false, ..CommunityConfig::default() };
    let store = cfg.open_store().unwrap();
    assert!(!store.options().clear_corrupt);
    assert!(store.keys().is_empty());
}
