//! Session-scoped key/value storage
//!
//! Values are kept as JSON text, the same way a browser tab's
//! `sessionStorage` holds them. Reads and writes never fail loudly: a value
//! that cannot be encoded or decoded is logged and treated as absent.

use super::Result;
use crate::error::StorageError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Key holding the id of the project the user is working on
pub const CURRENT_PROJECT_KEY: &str = "current_project";

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    items: BTreeMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoded value for `key`; `None` if missing or not decodable as `T`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.items.get(key)?;
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::error!("Storage get error for '{}': {}", key, e);
                None
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => {
                self.items.insert(key.to_string(), raw);
            }
            Err(e) => log::error!("Storage set error for '{}': {}", key, e),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.items.remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Restore a session written by [`save_to`](Self::save_to).
    /// A missing file is an empty session.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(|source| StorageError::FileIo {
            path: path.to_string_lossy().to_string(),
            source,
        })?;

        let items = serde_json::from_str(&content).map_err(|e| StorageError::SessionCorrupt {
            message: e.to_string(),
        })?;

        Ok(Self { items })
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let content =
            serde_json::to_string_pretty(&self.items).map_err(|e| StorageError::SessionCorrupt {
                message: e.to_string(),
            })?;

        fs::write(path, content).map_err(|source| StorageError::FileIo {
            path: path.to_string_lossy().to_string(),
            source,
        })
    }
}
