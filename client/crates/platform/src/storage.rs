//! Persistent key-value storage
//!
//! Small JSON-serialized settings store (theme, editor drafts, last tag
//! filter). Values are stored as JSON text under string keys; the whole map
//! is written back to disk on every change when the store is file-backed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use kernel::error::app_error::AppError;
use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Storage result type alias
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be (de)serialized
    #[error("Storage value for `{key}` is not valid: {source}")]
    Value {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backing file is not a JSON object of strings
    #[error("Storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Value { .. } => {
                AppError::bad_request(err.to_string()).with_source(err)
            }
            _ => AppError::internal(err.to_string()).with_source(err),
        }
    }
}

/// JSON key-value store, optionally backed by a file
#[derive(Debug, Default)]
pub struct LocalStorage {
    path: Option<PathBuf>,
    entries: RwLock<BTreeMap<String, String>>,
}

impl LocalStorage {
    /// Store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store, creating it lazily on first write
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
                    path: path.clone(),
                    source,
                })?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "Opened storage");

        Ok(Self {
            path: Some(path),
            entries: RwLock::new(entries),
        })
    }

    /// Store `value` under `key`
    pub fn set<T>(&self, key: &str, value: &T) -> StorageResult<()>
    where
        T: Serialize + ?Sized,
    {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Value {
            key: key.to_string(),
            source,
        })?;
        let mut entries = self.entries.write();
        let mut next = entries.clone();
        next.insert(key.to_string(), raw);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    /// Value under `key`; `None` when absent, empty or JSON `null`
    pub fn get<T>(&self, key: &str) -> StorageResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.raw_value(key)? {
            Some(value) if !value.is_null() => decode(key, value).map(Some),
            _ => Ok(None),
        }
    }

    /// Value under `key`, or `default` when the stored value is falsy
    ///
    /// Falsy follows the settings pages: missing, `null`, `false`, `0` and
    /// `""` all yield `default`. Empty arrays and objects are kept.
    pub fn get_default<T>(&self, key: &str, default: T) -> StorageResult<T>
    where
        T: DeserializeOwned,
    {
        match self.raw_value(key)? {
            Some(value) if !is_falsy(&value) => decode(key, value),
            _ => Ok(default),
        }
    }

    fn raw_value(&self, key: &str) -> StorageResult<Option<Value>> {
        let entries = self.entries.read();
        let Some(raw) = entries.get(key).filter(|raw| !raw.is_empty()) else {
            return Ok(None);
        };
        serde_json::from_str(raw)
            .map(Some)
            .map_err(|source| StorageError::Value {
                key: key.to_string(),
                source,
            })
    }

    pub fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(entries).map_err(|source| StorageError::Corrupt {
            path: path.clone(),
            source,
        })?;
        fs::write(path, raw)?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(key: &str, value: Value) -> StorageResult<T> {
    serde_json::from_value(value).map_err(|source| StorageError::Value {
        key: key.to_string(),
        source,
    })
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
