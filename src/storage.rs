use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Fixed, versioned key of the single application-state slot.
pub const STATE_STORAGE_KEY: &str = "budget-app-state:v2";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage slot {key} i/o failure: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("storage slot {key} unavailable: {reason}")]
    Unavailable { key: String, reason: String },
}

/// Durable key/value slots, one serialized document per key.
pub trait SlotStorage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Stores each slot as `<dir>/<key>.json`, `:` replaced by `_`.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| match c {
                ':' | '/' | '\\' => '_',
                other => other,
            })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

impl SlotStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            key: key.to_string(),
            source,
        })?;
        write_atomic(&self.slot_path(key), value.as_bytes()).map_err(|source| StorageError::Io {
            key: key.to_string(),
            source,
        })
    }
}

/// Write `bytes` to a temp file beside `path`, then rename it into place.
/// The parent directory must already exist.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[derive(Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<String, String>>,
    read_only: Mutex<bool>,
}

impl MemoryStorage {
    /// Make subsequent writes fail, simulating a full or locked store.
    pub fn set_read_only(&self, read_only: bool) {
        if let Ok(mut guard) = self.read_only.lock() {
            *guard = read_only;
        }
    }
}

impl SlotStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .data
            .lock()
            .map(|guard| guard.get(key).cloned())
            .unwrap_or_default())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only.lock().map(|flag| *flag).unwrap_or(false) {
            return Err(StorageError::Unavailable {
                key: key.to_string(),
                reason: "storage is read-only".to_string(),
            });
        }
        let mut guard = self.data.lock().map_err(|_| StorageError::Unavailable {
            key: key.to_string(),
            reason: "storage lock poisoned".to_string(),
        })?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Cheaply cloneable handle to the slot backend.
#[derive(Clone)]
pub struct StorageHandle {
    inner: Arc<dyn SlotStorage>,
}

impl StorageHandle {
    pub fn file(dir: impl Into<PathBuf>) -> Self {
        Self::from_backend(Arc::new(FileStorage::new(dir)))
    }

    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(MemoryStorage::default()))
    }

    pub fn from_backend(inner: Arc<dyn SlotStorage>) -> Self {
        Self { inner }
    }

    pub(crate) fn read_slot(&self) -> Result<Option<String>, StorageError> {
        self.inner.read(STATE_STORAGE_KEY)
    }

    pub(crate) fn write_slot(&self, value: &str) -> Result<(), StorageError> {
        self.inner.write(STATE_STORAGE_KEY, value)
    }

    /// Raw text currently held in the state slot.
    pub fn snapshot(&self) -> Option<String> {
        self.read_slot().ok().flatten()
    }
}
