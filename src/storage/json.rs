//! JSON file layout storage.
//!
//! Layouts are written pretty-printed with an atomic write (write-to-temp +
//! rename), so a crash mid-save leaves the previous layout intact.

use crate::domain::error::{PaneflowError, Result};
use crate::storage::backend::LayoutStorage;
use crate::storage::models::{LayoutDocument, CURRENT_LAYOUT_VERSION};
use std::path::{Path, PathBuf};

/// JSON file layout storage.
///
/// The last loaded or saved document is cached in memory. A save that failed
/// is retried when the storage is dropped.
#[derive(Debug)]
pub struct JsonLayoutStorage {
    file_path: PathBuf,
    cached: Option<LayoutDocument>,
    dirty: bool,
}

impl JsonLayoutStorage {
    /// Opens the layout file at `file_path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The file exists but is not a valid layout
    /// - The file was written by a newer format version
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing layout storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let cached = if file_path.exists() {
            Some(Self::load_from_file(&file_path)?)
        } else {
            tracing::debug!("no saved layout yet");
            None
        };

        Ok(Self {
            file_path,
            cached,
            dirty: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<LayoutDocument> {
        let contents = std::fs::read_to_string(path)?;
        let document: LayoutDocument = serde_json::from_str(&contents)
            .map_err(|e| PaneflowError::Storage(format!("failed to parse layout: {e}")))?;

        if document.version > CURRENT_LAYOUT_VERSION {
            return Err(PaneflowError::Storage(format!(
                "layout version {} is newer than supported version {CURRENT_LAYOUT_VERSION}",
                document.version
            )));
        }

        tracing::debug!(
            version = document.version,
            panes = document.panes.len(),
            saved_at = document.saved_at,
            "loaded layout"
        );
        Ok(document)
    }

    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }
        let Some(document) = &self.cached else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(document)
            .map_err(|e| PaneflowError::Storage(format!("failed to serialize layout: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, panes = document.panes.len(), "layout saved");
        Ok(())
    }
}

impl LayoutStorage for JsonLayoutStorage {
    fn load(&self) -> Result<Option<LayoutDocument>> {
        Ok(self.cached.clone())
    }

    fn save(&mut self, document: &LayoutDocument) -> Result<()> {
        let _span = tracing::debug_span!("json_save_layout", panes = document.panes.len()).entered();

        self.cached = Some(document.clone());
        self.dirty = true;
        self.save_to_file()
    }
}

impl Drop for JsonLayoutStorage {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("retrying layout save on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save layout on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::PaneRecord;
    use tempfile::TempDir;

    fn document() -> LayoutDocument {
        LayoutDocument {
            version: 1,
            saved_at: 1_718_000_000,
            panes: vec![PaneRecord {
                id: "crm".into(),
                type_id: "crm".into(),
                x: 0.0,
                y: 0.0,
                w: 480.0,
                h: 320.0,
                z: 1,
                docked: None,
                visible: true,
                locked: false,
                content: None,
            }],
        }
    }

    #[test]
    fn save_then_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("layout.json");

        let mut storage = JsonLayoutStorage::new(path.clone()).unwrap();
        assert_eq!(storage.load().unwrap(), None);
        storage.save(&document()).unwrap();
        assert!(!path.with_extension("tmp").exists());
        drop(storage);

        let reopened = JsonLayoutStorage::new(path).unwrap();
        assert_eq!(reopened.load().unwrap(), Some(document()));
    }

    #[test]
    fn newer_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, r#"{ "version": 99, "savedAt": 0, "panes": [] }"#).unwrap();

        let err = JsonLayoutStorage::new(path).unwrap_err();
        assert!(matches!(err, PaneflowError::Storage(ref m) if m.contains("99")));
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(JsonLayoutStorage::new(path), Err(PaneflowError::Storage(_))));
    }
}
