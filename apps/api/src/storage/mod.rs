//! Key-value persistence capability.
//!
//! The session store only ever needs `get`, `set` and `remove` on string
//! values under fixed keys, so that is all the trait offers. `FileStore` keeps
//! one JSON document per key on disk; `MemoryStore` backs the tests.

use thiserror::Error;

pub mod file;
#[cfg(test)]
pub mod memory;

pub use file::FileStore;
#[cfg(test)]
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The stored value exists but cannot be read back. Callers must not
    /// overwrite it.
    #[error("Unreadable value under '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    #[error("{0}")]
    Backend(String),
}

/// Raw string storage scoped to one client profile.
pub trait KeyValueStore: Send + Sync {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
