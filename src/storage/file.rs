//! Directory-backed store
//!
//! Layout: `<base>/<tab id>/<key>.json`. A fresh tab id (UUID v4) is generated
//! unless the caller resumes an existing one.

use super::{SessionStore, StoreError};
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct FileStore {
    tab_id: String,
    tab_dir: PathBuf,
}

impl FileStore {
    /// Open (or create) the directory for `tab_id` under `base_dir`
    ///
    /// # Errors
    ///
    /// Returns an error if the tab id is not a plain name or the tab directory
    /// cannot be created.
    pub fn open(base_dir: impl AsRef<Path>, tab_id: Option<&str>) -> Result<Self, StoreError> {
        let tab_id = match tab_id {
            Some(id) if Self::is_plain_name(id) => id.to_string(),
            Some(id) => {
                return Err(StoreError::Unavailable(format!("invalid tab id: {id:?}")));
            }
            None => Uuid::new_v4().to_string(),
        };

        let tab_dir = base_dir.as_ref().join(&tab_id);
        fs::create_dir_all(&tab_dir)?;

        info!("Session file store opened:");
        info!("  Tab id: {tab_id}");
        info!("  Directory: {}", tab_dir.display());

        Ok(Self { tab_id, tab_dir })
    }

    #[must_use]
    pub fn tab_id(&self) -> &str {
        &self.tab_id
    }

    #[must_use]
    pub fn tab_dir(&self) -> &Path {
        &self.tab_dir
    }

    fn is_plain_name(id: &str) -> bool {
        !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    /// Map a storage key to a file inside the tab directory
    fn slot_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.tab_dir.join(format!("{file_name}.json"))
    }
}

impl SessionStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!("Read slot {key} ({} bytes)", contents.len());
                Ok(Some(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Slot {key} does not exist yet");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.slot_path(key);
        // Write-then-rename so a crash never leaves a half-written record
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;
        debug!("Wrote slot {key} ({} bytes)", value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
