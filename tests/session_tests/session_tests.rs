//! Tests for Preferences sessions
//!
//! These tests verify:
//! - begin/end lifecycle (double begin, invalid names, end on drop)
//! - Operations on sessions that are not started
//! - Read-only sessions
//! - Key validation (reserved names)
//! - Byte read path: not found vs buffer too small vs empty value
//! - Key listing

use std::sync::Arc;

use prefstore::backend::{Backend, MemoryBackend, NullBackend};
use prefstore::path::{QUARANTINE_NAME, STAGING_NAME};
use prefstore::{Config, Preferences, PrefsError, StorageRoot};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_root() -> (MemoryBackend, Arc<StorageRoot>) {
    let backend = MemoryBackend::new();
    let root = Arc::new(StorageRoot::new(Config::default(), Arc::new(backend.clone())));
    (backend, root)
}

fn open(root: &Arc<StorageRoot>, name: &str, read_only: bool) -> Preferences {
    let mut prefs = Preferences::new(Arc::clone(root));
    prefs.begin(name, read_only).unwrap();
    prefs
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_begin_creates_namespace_directory() {
    let (backend, root) = setup_root();

    let prefs = open(&root, "wifi", false);

    assert!(prefs.is_started());
    assert!(!prefs.is_read_only());
    assert_eq!(prefs.namespace(), Some("wifi"));
    assert!(backend.exists("/nvs/wifi"));
}

#[test]
fn test_double_begin_rejected() {
    let (_backend, root) = setup_root();
    let mut prefs = open(&root, "a", false);

    let result = prefs.begin("b", false);

    assert!(matches!(result, Err(PrefsError::AlreadyStarted)));
    assert_eq!(prefs.namespace(), Some("a"));
}

#[test]
fn test_begin_invalid_names() {
    let (_backend, root) = setup_root();
    let mut prefs = Preferences::new(Arc::clone(&root));

    for name in ["", "a/b", "..", QUARANTINE_NAME] {
        let result = prefs.begin(name, false);
        assert!(matches!(result, Err(PrefsError::InvalidName(_))), "{:?}", name);
    }
    assert!(!prefs.is_started());
    // Name validation happens before the root is touched
    assert!(!root.is_ready());
}

#[test]
fn test_begin_over_file_fails() {
    let (backend, root) = setup_root();
    root.ensure_ready().unwrap();
    backend.create("/nvs/taken", b"file").unwrap();

    let mut prefs = Preferences::new(Arc::clone(&root));
    assert!(prefs.begin("taken", false).is_err());
    assert!(!prefs.is_started());
}

#[test]
fn test_end_then_reopen_other_namespace() {
    let (_backend, root) = setup_root();
    let mut prefs = open(&root, "a", false);
    prefs.put_string("k", "in a").unwrap();

    prefs.end();
    assert!(!prefs.is_started());
    assert_eq!(prefs.namespace(), None);

    prefs.begin("b", false).unwrap();
    assert!(!prefs.is_key("k"));

    prefs.end();
    prefs.begin("a", false).unwrap();
    assert_eq!(prefs.get_string("k", ""), "in a");
}

#[test]
fn test_end_is_noop_when_not_started() {
    let (_backend, root) = setup_root();
    let mut prefs = Preferences::new(root);

    prefs.end();
    prefs.end();
    assert!(!prefs.is_started());
}

#[test]
fn test_reopen_keeps_existing_values() {
    let (_backend, root) = setup_root();
    {
        let prefs = open(&root, "keep", false);
        prefs.put_bytes("k", b"v").unwrap();
    }
    let prefs = open(&root, "keep", false);
    assert_eq!(prefs.get_bytes_vec("k").unwrap(), b"v".to_vec());
}

// =============================================================================
// Not Started Tests
// =============================================================================

#[test]
fn test_operations_fail_when_not_started() {
    let (_backend, root) = setup_root();
    let prefs = Preferences::new(root);
    let mut buf = [0u8; 8];

    assert!(matches!(prefs.put_bytes("k", b"v"), Err(PrefsError::NotStarted)));
    assert!(matches!(prefs.get_bytes("k", &mut buf), Err(PrefsError::NotStarted)));
    assert!(matches!(prefs.get_bytes_length("k"), Err(PrefsError::NotStarted)));
    assert!(matches!(prefs.remove("k"), Err(PrefsError::NotStarted)));
    assert!(matches!(prefs.clear(), Err(PrefsError::NotStarted)));
    assert!(matches!(prefs.keys(), Err(PrefsError::NotStarted)));
    assert!(!prefs.is_key("k"));
    assert_eq!(prefs.get_i32("k", -5), -5);
}

#[test]
fn test_operations_fail_after_end() {
    let (_backend, root) = setup_root();
    let mut prefs = open(&root, "test", false);
    prefs.put_bytes("k", b"v").unwrap();

    prefs.end();

    assert!(matches!(prefs.put_bytes("k", b"w"), Err(PrefsError::NotStarted)));
    assert!(!prefs.is_key("k"));
}

// =============================================================================
// Read-Only Tests
// =============================================================================

#[test]
fn test_read_only_rejects_mutations() {
    let (_backend, root) = setup_root();
    {
        let prefs = open(&root, "ro", false);
        prefs.put_string("k", "v").unwrap();
    }

    let prefs = open(&root, "ro", true);
    assert!(prefs.is_read_only());

    assert!(matches!(prefs.put_bytes("k", b"w"), Err(PrefsError::ReadOnly)));
    assert!(matches!(prefs.remove("k"), Err(PrefsError::ReadOnly)));
    assert!(matches!(prefs.clear(), Err(PrefsError::ReadOnly)));

    // Reads still work and the value is untouched
    assert!(prefs.is_key("k"));
    assert_eq!(prefs.get_string("k", ""), "v");
}

// =============================================================================
// Key Validation Tests
// =============================================================================

#[test]
fn test_reserved_keys_rejected() {
    let (backend, root) = setup_root();
    let prefs = open(&root, "test", false);

    for key in [STAGING_NAME, QUARANTINE_NAME, "", "a/b"] {
        assert!(
            matches!(prefs.put_bytes(key, b"x"), Err(PrefsError::InvalidKey(_))),
            "{:?}",
            key
        );
        assert!(!prefs.is_key(key));
    }
    assert!(!backend.exists("/nvs/test/\u{7}_new?"));
}

#[test]
fn test_value_too_large_rejected() {
    let backend = MemoryBackend::new();
    let config = Config::builder().max_value_size(16).build();
    let root = Arc::new(StorageRoot::new(config, Arc::new(backend)));
    let prefs = open(&root, "test", false);

    assert_eq!(prefs.put_bytes("k", &[1u8; 16]).unwrap(), 16);
    let result = prefs.put_bytes("k", &[1u8; 17]);
    assert!(matches!(result, Err(PrefsError::ValueTooLarge { len: 17, max: 16 })));
    assert_eq!(prefs.get_bytes_length("k").unwrap(), 16);
}

// =============================================================================
// Byte Read Path Tests
// =============================================================================

#[test]
fn test_get_missing_key_not_found() {
    let (_backend, root) = setup_root();
    let prefs = open(&root, "test", false);
    let mut buf = [0u8; 8];

    assert!(matches!(prefs.get_bytes_length("nope"), Err(PrefsError::NotFound)));
    assert!(matches!(prefs.get_bytes("nope", &mut buf), Err(PrefsError::NotFound)));
    assert!(matches!(prefs.get_bytes_vec("nope"), Err(PrefsError::NotFound)));
}

#[test]
fn test_buffer_too_small_fails_without_partial_write() {
    let (_backend, root) = setup_root();
    let prefs = open(&root, "test", false);
    let value = [0x42u8; 50];
    prefs.put_bytes("big", &value).unwrap();

    let mut buf = [0u8; 10];
    let result = prefs.get_bytes("big", &mut buf);

    assert!(matches!(
        result,
        Err(PrefsError::Capacity {
            stored: 50,
            capacity: 10
        })
    ));
    assert_eq!(buf, [0u8; 10]);

    // Requery the length, then read with a buffer that fits
    let len = prefs.get_bytes_length("big").unwrap();
    let mut buf = vec![0u8; len];
    assert_eq!(prefs.get_bytes("big", &mut buf).unwrap(), 50);
    assert_eq!(buf, value.to_vec());
}

#[test]
fn test_empty_value_distinct_from_missing() {
    let (_backend, root) = setup_root();
    let prefs = open(&root, "test", false);
    prefs.put_bytes("empty", b"").unwrap();

    let mut buf = [0xFFu8; 4];
    assert_eq!(prefs.get_bytes_length("empty").unwrap(), 0);
    assert_eq!(prefs.get_bytes("empty", &mut buf).unwrap(), 0);
    assert_eq!(prefs.get_bytes("empty", &mut []).unwrap(), 0);
    assert_eq!(prefs.get_bytes_vec("empty").unwrap(), Vec::<u8>::new());
    assert_eq!(buf, [0xFFu8; 4]);
}

#[test]
fn test_smaller_value_fits_larger_buffer() {
    let (_backend, root) = setup_root();
    let prefs = open(&root, "test", false);
    prefs.put_bytes("k", b"abc").unwrap();

    let mut buf = [0u8; 16];
    assert_eq!(prefs.get_bytes("k", &mut buf).unwrap(), 3);
    assert_eq!(&buf[..3], b"abc");
    assert_eq!(&buf[3..], &[0u8; 13]);
}

// =============================================================================
// Remove Tests
// =============================================================================

#[test]
fn test_remove_leaves_other_keys() {
    let (_backend, root) = setup_root();
    let prefs = open(&root, "test", false);
    prefs.put_bytes("a", b"1").unwrap();
    prefs.put_bytes("b", b"2").unwrap();

    prefs.remove("a").unwrap();

    assert!(!prefs.is_key("a"));
    assert_eq!(prefs.get_bytes_vec("b").unwrap(), b"2".to_vec());
    assert!(matches!(prefs.remove("a"), Err(PrefsError::NotFound)));
}

// =============================================================================
// Key Listing Tests
// =============================================================================

#[test]
fn test_keys_sorted_and_hide_staging() {
    let (backend, root) = setup_root();
    let prefs = open(&root, "test", false);
    prefs.put_bytes("zeta", b"1").unwrap();
    prefs.put_bytes("alpha", b"2").unwrap();
    backend.create("/nvs/test/\u{7}_new?", b"staged").unwrap();

    assert_eq!(prefs.keys().unwrap(), vec!["alpha", "zeta"]);
}

// =============================================================================
// Null Backend Tests
// =============================================================================

#[test]
fn test_null_backend_stores_nothing() {
    let root = Arc::new(StorageRoot::new(Config::default(), Arc::new(NullBackend)));
    let prefs = open(&root, "test", false);

    assert_eq!(prefs.put_bytes("k", b"value").unwrap(), 5);
    assert!(!prefs.is_key("k"));
    assert!(matches!(prefs.get_bytes_length("k"), Err(PrefsError::NotFound)));
    assert_eq!(prefs.get_string("k", "default"), "default");
    assert!(prefs.clear().is_ok());
    assert!(prefs.keys().unwrap().is_empty());
}
