//! Durable key-value storage
//!
//! The game persists two records: the best score and the settings JSON.
//! Backends:
//! - `LocalStore`: browser LocalStorage (wasm32 only)
//! - `FileStore`: a JSON object on disk (native only)
//! - `MemoryStore`: in-process map, used by tests and as a fallback
//!
//! Storage failures are never fatal to the game; callers log and fall back.

pub mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;

#[cfg(target_arch = "wasm32")]
pub mod local;

pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No storage backend is reachable (e.g. LocalStorage disabled)
    #[error("Storage unavailable")]
    Unavailable,

    /// Filesystem failure.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file is not a valid JSON object.
    #[error("Storage format error: {0}")]
    Json(#[from] serde_json::Error),

    /// The browser rejected the operation (quota, privacy mode).
    #[error("Storage rejected operation: {0}")]
    Js(String),
}

/// A string key-value store scoped to this client
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` if the key is absent
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}
