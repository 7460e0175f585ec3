mod file;
mod memory;

use std::path::PathBuf;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("stored value for {key:?} is not valid utf-8")]
    NotUtf8 { key: String },
    #[error("storage quota exceeded: {len} bytes for {key:?} (limit {limit})")]
    QuotaExceeded { key: String, len: usize, limit: usize },
    #[error("empty storage key")]
    EmptyKey,
    #[error("store lock poisoned")]
    Poisoned,
}

/// Synchronous string key-value storage, modeled on browser local storage.
///
/// Callers treat every operation as best-effort; see `DraftStore` for the
/// layer that logs and swallows these errors.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
