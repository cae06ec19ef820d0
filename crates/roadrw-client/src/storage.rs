//! Key-value persistence port for session and configuration state
//!
//! The client never talks to a concrete store. Everything it persists goes
//! through [`KeyValueStore`], which has two implementations here:
//! - [`MemoryStore`]: process-local map, used by tests and ephemeral sessions
//! - [`FileStore`]: one file per key under a directory the caller picks

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use parking_lot::RwLock;

use crate::error::{ClientError, Result};

/// Logical key names shared with the browser build of the front end.
pub mod keys {
    pub const ENVIRONMENT_CONFIG: &str = "environmentConfig";
    pub const TOKEN: &str = "token";
    pub const USER: &str = "user";
    pub const REFRESH_TOKEN: &str = "refreshToken";
    pub const SELECTED_ENVIRONMENT: &str = "app.env.selected";
    pub const SELECTED_BASE_URL: &str = "app.env.baseUrl";
}

/// Durable string storage keyed by name.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// File-backed store: `<base>/<key>` holds the raw value.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Keys are logical names like `app.env.selected`; anything outside
    /// `[A-Za-z0-9._-]` is replaced so a key can never escape the base dir.
    fn key_file(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let name = name.trim_start_matches('.');
        self.base_path.join(if name.is_empty() { "_" } else { name })
    }

    fn read_file(path: &Path) -> anyhow::Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let file = self.key_file(key);
        if !file.exists() {
            return Ok(None);
        }

        Self::read_file(&file)
            .map(Some)
            .map_err(|e| ClientError::Persistence(format!("{:#}", e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.base_path).map_err(|e| {
            ClientError::Persistence(format!(
                "Failed to create {:?}: {}",
                self.base_path, e
            ))
        })?;

        let file = self.key_file(key);
        fs::write(&file, value).map_err(|e| {
            ClientError::Persistence(format!("Failed to write {:?}: {}", file, e))
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let file = self.key_file(key);
        if file.exists() {
            fs::remove_file(&file).map_err(|e| {
                ClientError::Persistence(format!("Failed to remove {:?}: {}", file, e))
            })?;
        }
        Ok(())
    }
}
