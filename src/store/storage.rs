use crate::domain::models::AppDocument;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Durable local storage for the root document: one JSON blob at a fixed
/// path. Last successful write wins; there is no versioning or recovery
/// beyond falling back to the initial document on a bad read.
#[derive(Clone, Debug)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted document. A missing file yields the initial
    /// document; a corrupt one is abandoned with a diagnostic and the
    /// initial document is returned (prior data is lost silently).
    /// Fields absent from older blobs are backfilled by serde defaults.
    pub fn load(&self) -> AppDocument {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return AppDocument::default();
            }
            Err(e) => {
                tracing::warn!("failed to read {}: {e}", self.path.display());
                return AppDocument::default();
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(
                    "discarding corrupt state blob at {}: {e}",
                    self.path.display()
                );
                AppDocument::default()
            }
        }
    }

    pub fn save(&self, doc: &AppDocument) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_vec(doc)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    /// Removes the blob entirely; loading afterwards yields the initial
    /// document.
    pub fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{BlockId, BlockState};

    fn storage_in(dir: &tempfile::TempDir) -> JsonStorage {
        JsonStorage::new(dir.path().join("wallnut-data.json"))
    }

    #[test]
    fn missing_file_loads_initial_document() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);
        assert_eq!(storage.load(), AppDocument::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);
        let mut doc = AppDocument::default();
        doc.onboarding_complete = true;
        doc.answers.insert("execution.kpi_tracking".into(), "ok".into());
        storage.save(&doc).unwrap();
        assert_eq!(storage.load(), doc);
    }

    #[test]
    fn corrupt_blob_falls_back_to_initial_document() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);
        fs::write(storage.path(), b"{not json").unwrap();
        assert_eq!(storage.load(), AppDocument::default());
    }

    #[test]
    fn serialization_is_byte_stable() {
        let mut doc = AppDocument::default();
        doc.block_mut(BlockId::Market).state = BlockState::InProgress;
        doc.block_mut(BlockId::Market).progress = 35;
        doc.audio_answers.insert("execution.kpi_tracking".into(), String::new());

        let first = serde_json::to_vec(&doc).unwrap();
        let reloaded: AppDocument = serde_json::from_slice(&first).unwrap();
        let second = serde_json::to_vec(&reloaded).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn notifications_are_never_persisted() {
        use crate::domain::models::{Notification, NotificationKind};
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);
        let mut doc = AppDocument::default();
        doc.notifications
            .push(Notification::new(NotificationKind::Info, "effimera"));
        storage.save(&doc).unwrap();
        assert!(storage.load().notifications.is_empty());
    }

    #[test]
    fn older_blob_without_block_data_backfills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);
        fs::write(storage.path(), br#"{"onboarding_complete":true}"#).unwrap();
        let doc = storage.load();
        assert!(doc.onboarding_complete);
        assert_eq!(doc.profile, Default::default());
        assert_eq!(doc.block(BlockId::Profile).state, BlockState::Todo);
    }

    #[test]
    fn clear_removes_the_blob() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);
        storage.save(&AppDocument::default()).unwrap();
        storage.clear().unwrap();
        assert!(!storage.path().exists());
        storage.clear().unwrap(); // idempotent
    }
}
