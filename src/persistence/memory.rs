//! In-memory store

use std::collections::HashMap;

use super::{KeyValueStore, StorageError};

/// Simulated backend breakage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Fault {
    #[default]
    None,
    /// Reads work, writes fail
    ReadOnly,
    /// Reads and writes both fail
    Unavailable,
}

/// Volatile store; contents vanish with the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    fault: Fault,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, for exercising fallback paths
    pub fn read_only() -> Self {
        Self {
            values: HashMap::new(),
            fault: Fault::ReadOnly,
        }
    }

    /// A store that fails every read and write
    pub fn unavailable() -> Self {
        Self {
            values: HashMap::new(),
            fault: Fault::Unavailable,
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fault == Fault::Unavailable {
            return Err(StorageError::Unavailable);
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fault != Fault::None {
            return Err(StorageError::Unavailable);
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
