//! Tests for the bundled [`KeyValueStore`] implementations.

use mimir::{FileStore, KeyValueStore, MemoryStore};

/// Behaviour every store must share.
async fn exercise_store(store: &dyn KeyValueStore) {
    assert!(store.get("a").await.unwrap().is_none());
    assert!(store.keys().await.unwrap().is_empty());

    store.set("a", b"one".to_vec()).await.unwrap();
    store.set("b", b"two".to_vec()).await.unwrap();
    assert_eq!(store.get("a").await.unwrap(), Some(b"one".to_vec()));

    // Overwrite
    store.set("a", b"uno".to_vec()).await.unwrap();
    assert_eq!(store.get("a").await.unwrap(), Some(b"uno".to_vec()));

    let mut keys = store.keys().await.unwrap();
    keys.sort();
    assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

    store.delete("a").await.unwrap();
    assert!(store.get("a").await.unwrap().is_none());

    // Deleting an absent key is fine
    store.delete("a").await.unwrap();
    store.delete("never-existed").await.unwrap();

    assert_eq!(store.keys().await.unwrap(), vec!["b".to_string()]);
}

// =========================================================================
// MemoryStore
// =========================================================================

#[tokio::test]
async fn memory_store_basic_operations() {
    let store = MemoryStore::new();
    exercise_store(&store).await;
    assert_eq!(store.len(), 1);
    assert!(!store.is_empty());
}

#[tokio::test]
async fn memory_store_empty_value() {
    let store = MemoryStore::new();
    store.set("k", Vec::new()).await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), Some(Vec::new()));
}

// =========================================================================
// FileStore
// =========================================================================

#[tokio::test]
async fn file_store_basic_operations() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("entries"));
    exercise_store(&store).await;
}

#[tokio::test]
async fn file_store_missing_dir_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("does").join("not").join("exist"));

    assert!(store.get("k").await.unwrap().is_none());
    assert!(store.keys().await.unwrap().is_empty());
    store.delete("k").await.unwrap();
}

#[tokio::test]
async fn file_store_creates_dir_on_first_write() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested").join("cache");
    let store = FileStore::new(&nested);

    store.set("k", b"v".to_vec()).await.unwrap();

    assert!(nested.is_dir());
    assert_eq!(std::fs::read_dir(&nested).unwrap().count(), 1);
}

#[tokio::test]
async fn file_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();

    FileStore::new(dir.path())
        .set("mimir.response.abc", b"persisted".to_vec())
        .await
        .unwrap();

    let reopened = FileStore::new(dir.path());
    assert_eq!(
        reopened.get("mimir.response.abc").await.unwrap(),
        Some(b"persisted".to_vec())
    );
    assert_eq!(
        reopened.keys().await.unwrap(),
        vec!["mimir.response.abc".to_string()]
    );
}

#[tokio::test]
async fn file_store_handles_awkward_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    let key = "../escape/attempt: ü";
    store.set(key, b"v".to_vec()).await.unwrap();

    assert_eq!(store.get(key).await.unwrap(), Some(b"v".to_vec()));
    assert_eq!(store.keys().await.unwrap(), vec![key.to_string()]);
    // Nothing escaped the directory
    assert!(!dir.path().parent().unwrap().join("escape").exists());
}

#[tokio::test]
async fn file_store_ignores_foreign_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("README.txt"), "hi").unwrap();
    std::fs::write(dir.path().join("zz-not-hex.json"), "{}").unwrap();

    let store = FileStore::new(dir.path());
    store.set("k", b"v".to_vec()).await.unwrap();

    assert_eq!(store.keys().await.unwrap(), vec!["k".to_string()]);
}

#[tokio::test]
async fn file_store_leaves_no_tmp_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    for i in 0..5 {
        store.set(&format!("k{i}"), b"v".to_vec()).await.unwrap();
    }

    let leftovers = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn file_store_rejects_keys_too_long_for_a_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    let longest = "k".repeat(mimir::store::file::MAX_KEY_LEN);
    store.set(&longest, b"v".to_vec()).await.unwrap();
    assert_eq!(store.get(&longest).await.unwrap(), Some(b"v".to_vec()));

    let too_long = format!("{longest}k");
    assert!(store.set(&too_long, b"v".to_vec()).await.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn two_file_stores_on_one_dir_write_concurrently() {
    let dir = tempfile::tempdir().unwrap();
    let first = FileStore::new(dir.path());
    let second = FileStore::new(dir.path());
    let big_a = vec![b'a'; 4 * 1024 * 1024];
    let big_b = vec![b'b'; 4 * 1024 * 1024];

    for _ in 0..30 {
        let (ra, rb) = tokio::join!(
            first.set("k", big_a.clone()),
            second.set("k", big_b.clone())
        );
        ra.unwrap();
        rb.unwrap();

        // Whole value from one writer, never a mix or a truncation
        let stored = first.get("k").await.unwrap().unwrap();
        assert!(stored == big_a || stored == big_b);
    }

    assert_eq!(first.keys().await.unwrap(), vec!["k".to_string()]);
}
