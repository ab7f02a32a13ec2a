//! Key/value storage slots for catalog snapshots.
//!
//! Mirrors the browser `localStorage` surface: string keys, string values,
//! synchronous access. Native builds use [`FileStorage`]; wasm builds can use
//! [`LocalStorage`]; tests use [`InMemoryStorage`].

use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A synchronous string key/value store.
pub trait SnapshotStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<S> SnapshotStorage for Arc<S>
where
    S: SnapshotStorage + ?Sized,
{
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// Check that `key` is usable by every backend.
///
/// Keys are non-empty, made of ASCII letters, digits, `.`, `_` or `-`, and do
/// not start with `.` (they double as file names for [`FileStorage`]).
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// In-memory storage for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    inner: RwLock<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStorage for InMemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        map.remove(key);
        Ok(())
    }
}

/// One JSON file per key under a directory: `{dir}/{key}.json`.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStorage {
    /// Open (and create if needed) a storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Storage under the OS data directory: `{app_data_dir}/storefront`.
    pub fn open_default() -> Result<Self, StorageError> {
        Self::open(default_dir()?)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SnapshotStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        // Write-then-rename so readers never see a half-written snapshot.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Resolve the default storage directory: `{app_data_dir}/storefront`.
#[cfg(not(target_arch = "wasm32"))]
pub fn default_dir() -> Result<PathBuf, StorageError> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or_else(|| {
            StorageError::Unavailable(
                "failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share"
                    .to_string(),
            )
        })?;

    Ok(base.join("storefront"))
}

/// The browser's `window.localStorage`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window object".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("localStorage access denied: {e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage not available".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl SnapshotStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("getItem failed: {e:?}")))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Unavailable(format!("setItem failed: {e:?}")))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Unavailable(format!("removeItem failed: {e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_round_trip_and_remove() {
        let storage = InMemoryStorage::new();
        assert_eq!(storage.get_item("products").unwrap(), None);

        storage.set_item("products", "[]").unwrap();
        assert_eq!(storage.get_item("products").unwrap().as_deref(), Some("[]"));

        storage.set_item("products", "[1]").unwrap();
        assert_eq!(storage.get_item("products").unwrap().as_deref(), Some("[1]"));

        storage.remove_item("products").unwrap();
        assert_eq!(storage.get_item("products").unwrap(), None);
    }

    #[test]
    fn arc_storage_delegates() {
        let shared = Arc::new(InMemoryStorage::new());
        let dyn_storage: Arc<dyn SnapshotStorage> = shared.clone();
        dyn_storage.set_item("k", "v").unwrap();
        assert_eq!(shared.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn file_storage_overwrites_single_slot() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("nested")).unwrap();

        assert_eq!(storage.get_item("products").unwrap(), None);
        storage.set_item("products", "[\"a\"]").unwrap();
        storage.set_item("products", "[\"b\"]").unwrap();
        assert_eq!(
            storage.get_item("products").unwrap().as_deref(),
            Some("[\"b\"]")
        );
        assert!(storage.dir().join("products.json").exists());
        assert!(!storage.dir().join("products.json.tmp").exists());

        storage.remove_item("products").unwrap();
        storage.remove_item("products").unwrap();
        assert_eq!(storage.get_item("products").unwrap(), None);
    }

    #[test]
    fn key_validation() {
        for key in ["products", "shop.catalog", "v2_items-1"] {
            assert!(validate_key(key).is_ok(), "{key}");
        }
        for key in ["", "my catalog", "../escape", "a/b", ".hidden", "prodüct"] {
            assert!(matches!(validate_key(key), Err(StorageError::InvalidKey(_))), "{key}");
        }
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(
                storage.get_item(key),
                Err(StorageError::InvalidKey(_))
            ));
        }
    }
}
