//! Durable key-value storage for the theme preference.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::StoreError;

/// Durable per-origin storage, the role `localStorage` plays in a browser.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` if absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// In-process storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().insert(key.into(), value.into());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage backed by a JSON object file.
///
/// The file is read on every `get` and rewritten on every `set`, so separate
/// processes pointing at the same path see each other's writes. A missing
/// file reads as empty. An unparsable file also reads as empty, but `set`
/// refuses to overwrite it.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, String> {
        let source = match std::fs::read_to_string(&self.path) {
            Ok(source) => source,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new())
            }
            Err(err) => return Err(format!("{}: {}", self.path.display(), err)),
        };
        serde_json::from_str(&source).map_err(|err| {
            format!(
                "{}: existing file is not a JSON object of strings: {}",
                self.path.display(),
                err
            )
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_entries() {
            Ok(mut entries) => entries.remove(key),
            Err(reason) => {
                tracing::warn!(key, %reason, "ignoring unreadable store file");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let write_error = |reason: String| StoreError::Write {
            key: key.to_string(),
            reason,
        };

        let mut entries = self.read_entries().map_err(write_error)?;
        entries.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&entries).map_err(|e| write_error(e.to_string()))?;
        std::fs::write(&self.path, json)
            .map_err(|e| write_error(format!("{}: {}", self.path.display(), e)))
    }
}
