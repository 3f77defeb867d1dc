//! Tab-scoped key-value storage for the session record
//!
//! A store is one "tab": values survive a restart of the controller that owns
//! them, but separate tabs never see each other's slots.
//!
//! - [`memory`] - in-process store, lives as long as the process
//! - [`file`] - directory-backed store, one directory per tab

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable string slots addressed by key
pub trait SessionStore: Send + Sync {
    /// Read the raw value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Drop the value stored under `key`; removing a missing key is not an error
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Backend name for log lines
    fn backend_name(&self) -> &'static str;
}
