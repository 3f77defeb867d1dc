//! Session record bound to one storage slot
//!
//! Reads fall back to the default record; write failures are logged and never
//! abort a state transition. The in-memory record stays authoritative.

use crate::models::SessionRecord;
use crate::storage::{SessionStore, StoreError};
use crate::utils::logging::LoggingHelper;
use std::sync::Arc;

/// Storage key used when none is configured
pub const DEFAULT_SESSION_KEY: &str = "IDPorten-AUTH";

#[derive(Clone)]
pub struct PersistedSession {
    store: Arc<dyn SessionStore>,
    key: String,
}

impl PersistedSession {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the persisted record, or the default when the slot is empty or unreadable
    #[must_use]
    pub fn load_or_default(&self) -> SessionRecord {
        match self.try_load() {
            Ok(Some(record)) => record,
            Ok(None) => {
                log::debug!("No persisted session under {}, starting from default", self.key);
                SessionRecord::default()
            }
            Err(e) => {
                LoggingHelper::log_store_unreadable(&self.key, &e);
                SessionRecord::default()
            }
        }
    }

    /// Read and parse the persisted record
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the stored JSON is invalid.
    pub fn try_load(&self) -> Result<Option<SessionRecord>, StoreError> {
        self.store
            .load(&self.key)?
            .map(|raw| serde_json::from_str(&raw).map_err(StoreError::from))
            .transpose()
    }

    /// Persist `record`, logging instead of failing
    pub fn write(&self, record: &SessionRecord) {
        if let Err(e) = self.try_write(record) {
            LoggingHelper::log_store_write_failure(self.store.backend_name(), &self.key, &e);
        }
    }

    /// Persist `record`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn try_write(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let raw = serde_json::to_string(record)?;
        self.store.save(&self.key, &raw)
    }
}

impl std::fmt::Debug for PersistedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedSession")
            .field("backend", &self.store.backend_name())
            .field("key", &self.key)
            .finish()
    }
}
