//! Factory for building a configured `SessionController` from settings
//!
//! The identity client itself comes from the caller: the factory hands it the
//! `IdentityClientConfig` verbatim and wires the returned client to the
//! configured store.

use super::controller::{ControllerOptions, SessionController};
use crate::identity::{IdentityClient, IdentityClientConfig};
use crate::settings::{SessionSettings, StorageBackend, StorageSettings};
use crate::storage::{FileStore, MemoryStore, SessionStore};
use anyhow::{Context, Result};
use std::sync::Arc;

pub struct SessionControllerFactory;

impl SessionControllerFactory {
    /// Create a controller from settings and an identity client constructor
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The identity client constructor fails
    /// - The configured store cannot be opened
    pub fn create<F>(settings: &SessionSettings, make_client: F) -> Result<SessionController>
    where
        F: FnOnce(&IdentityClientConfig) -> Result<Arc<dyn IdentityClient>>,
    {
        log::info!("🏭 Building session controller...");

        if !settings.identity.is_configured() {
            log::warn!("⚠️  Identity client options incomplete (authority, client_id, redirect_uri)");
        }

        let client = make_client(&settings.identity).context("Failed to create identity client")?;
        let store = Self::create_store(&settings.storage)?;
        let options = ControllerOptions::from_settings(settings);

        log::info!(
            "✅ Session controller ready: store={}, key={}, login={}, logout={}",
            store.backend_name(),
            options.session_key,
            options.login_method,
            options.logout_method
        );

        Ok(SessionController::new(client, store, options))
    }

    /// Open the store selected in the storage settings
    ///
    /// # Errors
    ///
    /// Returns an error if the file store directory cannot be created.
    pub fn create_store(storage: &StorageSettings) -> Result<Arc<dyn SessionStore>> {
        match storage.backend {
            StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
            StorageBackend::File => {
                let store = FileStore::open(&storage.directory, storage.tab_id.as_deref())
                    .with_context(|| {
                        format!("Failed to open session store in {}", storage.directory)
                    })?;
                Ok(Arc::new(store))
            }
        }
    }
}
