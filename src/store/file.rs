//! File-backed store: one file per key.
//!
//! Each key maps to `<dir>/<hex(key)>.json`. Hex-encoding the full key keeps
//! arbitrary namespace prefixes filesystem-safe and lets [`keys`] recover
//! the original key from the file name alone.
//!
//! Writes go to a uniquely named `.tmp` sibling first and are renamed into
//! place, so a reader never sees a partially written value, even with
//! several processes writing the same directory.
//!
//! [`keys`]: KeyValueStore::keys

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use super::KeyValueStore;
use crate::{MimirError, Result};

const EXTENSION: &str = ".json";

/// Longest file name most filesystems accept.
const NAME_MAX: usize = 255;

/// Longest key a [`FileStore`] can hold: the hex-encoded key plus the
/// extension must fit in one file name.
pub const MAX_KEY_LEN: usize = (NAME_MAX - EXTENSION.len()) / 2;

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Default store directory: `~/.cache/mimir/responses`.
pub fn default_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("mimir")
        .join("responses")
}

/// Durable [`KeyValueStore`] keeping one file per key in a directory.
///
/// The directory is created on first write. Foreign files in the directory
/// (anything not named `<hex>.json`) are ignored by [`keys`](KeyValueStore::keys).
///
/// Keys longer than [`MAX_KEY_LEN`] bytes are rejected by `set`.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. Nothing is touched on disk yet.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create a store at [`default_dir`].
    pub fn at_default_dir() -> Self {
        Self::new(default_dir())
    }

    /// Directory holding the entry files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{EXTENSION}", hex::encode(key)))
    }

    /// Temp file name unique per process and per write. Its length does not
    /// depend on the key.
    fn tmp_path(&self) -> PathBuf {
        let n = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!(".{}-{n}.tmp", std::process::id()))
    }
}

/// Recover a key from an entry file name, if it is one of ours.
fn key_from_file_name(name: &str) -> Option<String> {
    let encoded = name.strip_suffix(EXTENSION)?;
    let bytes = hex::decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

#[async_trait]
impl KeyValueStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        if key.len() > MAX_KEY_LEN {
            return Err(MimirError::Store(format!(
                "key of {} bytes exceeds file store limit of {MAX_KEY_LEN}",
                key.len()
            )));
        }

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            MimirError::Store(format!(
                "failed to create store dir {}: {e}",
                self.dir.display()
            ))
        })?;

        let path = self.path_for(key);
        let tmp_path = self.tmp_path();
        if let Err(e) = tokio::fs::write(&tmp_path, &value).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(MimirError::Store(format!(
                "failed to rename {} → {}: {e}",
                tmp_path.display(),
                path.display()
            )));
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(d) => d,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            if let Some(key) = entry.file_name().to_str().and_then(key_from_file_name) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_roundtrip() {
        let store = FileStore::new("/tmp/x");
        let path = store.path_for("mimir.response.abc");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert_eq!(key_from_file_name(name).as_deref(), Some("mimir.response.abc"));
    }

    #[test]
    fn tmp_files_are_not_keys() {
        let store = FileStore::new("/tmp/x");
        let tmp = store.tmp_path();
        assert!(key_from_file_name(tmp.file_name().unwrap().to_str().unwrap()).is_none());
    }

    #[test]
    fn tmp_paths_are_unique() {
        let store = FileStore::new("/tmp/x");
        assert_ne!(store.tmp_path(), store.tmp_path());
    }

    #[test]
    fn longest_key_fits_in_a_file_name() {
        let store = FileStore::new("/tmp/x");
        let path = store.path_for(&"k".repeat(MAX_KEY_LEN));
        assert!(path.file_name().unwrap().len() <= NAME_MAX);
    }

    #[test]
    fn foreign_files_are_not_keys() {
        assert!(key_from_file_name("notes.txt").is_none());
        assert!(key_from_file_name("not-hex.json").is_none());
    }

    #[test]
    fn default_dir_ends_in_mimir_responses() {
        assert!(default_dir().ends_with("mimir/responses"));
    }
}
