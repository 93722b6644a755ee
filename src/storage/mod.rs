//! Durable blob storage behind the `PersistenceAdapter` trait.
//!
//! The session and vault layers never touch the filesystem directly;
//! they read and write opaque blobs through this boundary.  Two keys
//! are in use: `"session"` for the persisted session identity and
//! `"vault/<user_id>"` for the active session's vault snapshot.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::errors::{Result, SecureVaultError};

/// Durable key/value storage the core depends on.
///
/// Implementations must make `delete_blob` idempotent: deleting a key
/// that does not exist is a no-op, not an error.
pub trait PersistenceAdapter: Send + Sync {
    /// Read the blob stored under `key`, if any.
    fn read_blob(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous blob.
    fn write_blob(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove the blob under `key`.  No-op when absent.
    fn delete_blob(&self, key: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

/// One file per key under a data directory.
///
/// Writes are atomic: the blob goes to a temp file in the same
/// directory first, then a rename swaps it into place, so readers
/// never observe a half-written blob.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `root`.  The directory is created
    /// lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a blob key to its on-disk path.
    ///
    /// Key segments are separated by `/` and become subdirectories,
    /// e.g. `vault/user_abc` -> `<root>/vault/user_abc.blob`.
    fn blob_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        let mut path = self.root.clone();
        for segment in key.split('/') {
            path.push(segment);
        }
        path.set_extension("blob");
        Ok(path)
    }
}

impl PersistenceAdapter for FileStorage {
    fn read_blob(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.blob_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read(&path)
            .map_err(|e| SecureVaultError::Persistence(format!("read {}: {e}", path.display())))?;
        Ok(Some(data))
    }

    fn write_blob(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.blob_path(key)?;
        let parent = path.parent().unwrap_or(Path::new("."));
        fs::create_dir_all(parent).map_err(|e| {
            SecureVaultError::Persistence(format!("create {}: {e}", parent.display()))
        })?;

        // Atomic write: temp file in the same directory, then rename.
        let tmp_path = parent.join(format!(
            ".{}.tmp",
            path.file_name().unwrap_or_default().to_string_lossy()
        ));
        fs::write(&tmp_path, value).map_err(|e| {
            SecureVaultError::Persistence(format!("write {}: {e}", tmp_path.display()))
        })?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            SecureVaultError::Persistence(format!("rename to {}: {e}", path.display()))
        })?;

        Ok(())
    }

    fn delete_blob(&self, key: &str) -> Result<()> {
        let path = self.blob_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SecureVaultError::Persistence(format!(
                "delete {}: {e}",
                path.display()
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// In-memory adapter used by tests and embedding callers that do not
/// want anything on disk.
#[derive(Default)]
pub struct MemoryStorage {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceAdapter for MemoryStorage {
    fn read_blob(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| SecureVaultError::Persistence("storage lock poisoned".into()))?;
        Ok(blobs.get(key).cloned())
    }

    fn write_blob(&self, key: &str, value: &[u8]) -> Result<()> {
        validate_key(key)?;
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| SecureVaultError::Persistence("storage lock poisoned".into()))?;
        blobs.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete_blob(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| SecureVaultError::Persistence("storage lock poisoned".into()))?;
        blobs.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Key validation
// ---------------------------------------------------------------------------

/// Validate that a blob key is safe to map onto a path.
///
/// Allowed segment characters: ASCII letters, digits, underscores,
/// hyphens, periods (no leading period).  Rejects empty keys and
/// anything that could escape the data directory.
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(SecureVaultError::Persistence(
            "blob key cannot be empty".into(),
        ));
    }
    for segment in key.split('/') {
        if segment.is_empty() || segment.starts_with('.') {
            return Err(SecureVaultError::Persistence(format!(
                "blob key '{key}' has an invalid segment"
            )));
        }
        if !segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
        {
            return Err(SecureVaultError::Persistence(format!(
                "blob key '{key}' contains invalid characters"
            )));
        }
    }
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_storage_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path());

        assert!(storage.read_blob("session").unwrap().is_none());
        storage.write_blob("session", b"hello").unwrap();
        assert_eq!(storage.read_blob("session").unwrap().unwrap(), b"hello");
    }

    #[test]
    fn file_storage_nested_key_creates_subdirectory() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path());

        storage.write_blob("vault/user_abc123", b"{}").unwrap();
        assert!(tmp.path().join("vault").join("user_abc123.blob").exists());
    }

    #[test]
    fn file_storage_delete_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path());

        storage.write_blob("session", b"x").unwrap();
        storage.delete_blob("session").unwrap();
        // Second delete of the same key must still succeed.
        storage.delete_blob("session").unwrap();
        assert!(storage.read_blob("session").unwrap().is_none());
    }

    #[test]
    fn memory_storage_roundtrip_and_delete() {
        let storage = MemoryStorage::new();
        storage.write_blob("vault/u1", b"data").unwrap();
        assert_eq!(storage.read_blob("vault/u1").unwrap().unwrap(), b"data");

        storage.delete_blob("vault/u1").unwrap();
        storage.delete_blob("vault/u1").unwrap();
        assert!(storage.read_blob("vault/u1").unwrap().is_none());
    }

    #[test]
    fn rejects_path_escaping_keys() {
        let storage = MemoryStorage::new();
        assert!(storage.write_blob("", b"x").is_err());
        assert!(storage.write_blob("../evil", b"x").is_err());
        assert!(storage.write_blob("a//b", b"x").is_err());
        assert!(storage.write_blob(".hidden", b"x").is_err());
    }
}
