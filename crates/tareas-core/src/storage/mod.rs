//! Storage collaborator for the task store.
//!
//! The store persists through a key-value abstraction with JSON values, so
//! the presentation layer can supply whatever backing it has (the desktop
//! shell keeps a browser-local store; tests use the in-memory one). Two
//! implementations ship here: [`MemoryStorage`] and a JSON-file-backed
//! [`JsonFileStorage`].

pub mod config;

use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::Value;

use crate::error::{Result, TaskError};

pub use config::Settings;

/// Key under which the task list is persisted.
pub const TASKS_KEY: &str = "todo-tasks";
/// Key for the theme preference, owned by the presentation layer.
pub const THEME_KEY: &str = "todo-theme";

/// Key-value storage with JSON values.
pub trait Storage {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Value>>;
    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

/// In-memory storage, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, Value>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// File-backed storage keeping all keys in a single JSON object on disk.
///
/// The file is rewritten whole on every `set`; a missing file reads as
/// empty storage.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Open storage at the given path. The file is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, Value>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&content)
            .map_err(|e| TaskError::Storage(format!("archivo de datos corrupto: {e}")))
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value);
        let content = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
