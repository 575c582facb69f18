//! File-based storage implementation.
//!
//! Stores each draft as a JSON file in a base directory.

use super::{BoxFuture, Draft, Storage, StorageError, StorageResult};
use log::debug;
use std::fs;
use std::path::PathBuf;

/// File-based draft storage.
pub struct FileStorage {
    /// Base directory for draft storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("failed to create storage directory: {e}"))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default platform location.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("could not determine home directory".to_string()))?;
        Self::new(base.join("signpad").join("drafts"))
    }

    /// Get the file path for a draft ID, with the ID sanitized into a
    /// safe filename.
    fn draft_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{safe_id}.json"))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, draft: &Draft) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.draft_path(id);
        let json = match serde_json::to_string_pretty(draft) {
            Ok(j) => j,
            Err(e) => {
                return Box::pin(async move { Err(StorageError::Serialization(e.to_string())) });
            }
        };

        Box::pin(async move {
            debug!("saving draft to {}", path.display());
            fs::write(&path, json)
                .map_err(|e| StorageError::Io(format!("failed to write {}: {e}", path.display())))
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Draft>> {
        let path = self.draft_path(id);
        let id_owned = id.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id_owned));
            }

            let json = fs::read_to_string(&path)
                .map_err(|e| StorageError::Io(format!("failed to read {}: {e}", path.display())))?;

            serde_json::from_str(&json).map_err(|e| {
                StorageError::Serialization(format!("failed to parse {}: {e}", path.display()))
            })
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.draft_path(id);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("failed to delete {}: {e}", path.display()))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let entries = fs::read_dir(&self.base_path)
                .map_err(|e| StorageError::Io(format!("failed to list drafts: {e}")))?;

            let mut ids = Vec::new();
            for entry in entries {
                let entry =
                    entry.map_err(|e| StorageError::Io(format!("failed to list drafts: {e}")))?;
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) == Some("json") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        ids.push(stem.to_string());
                    }
                }
            }
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.draft_path(id);
        Box::pin(async move { Ok(path.exists()) })
    }
}

#[cfg(test)]
mod tests {
    use super::super::block_on;
    use super::*;
    use crate::document::DocumentDraft;
    use crate::field::FieldType;
    use crate::geometry::FieldRect;

    fn temp_storage() -> (tempfile::TempDir, FileStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("drafts")).unwrap();
        (dir, storage)
    }

    #[test]
    fn test_save_load_roundtrip() {
        let (_dir, storage) = temp_storage();
        let mut doc = DocumentDraft::new("Lease");
        doc.add_field(FieldType::Signature, 1, FieldRect::new(10.0, 10.0, 150.0, 50.0));
        let draft = Draft::Template(doc);

        block_on(storage.save(draft.id(), &draft)).unwrap();
        let loaded = block_on(storage.load(draft.id())).unwrap();

        assert_eq!(loaded.id(), draft.id());
        assert_eq!(loaded.name(), "Lease");
    }

    #[test]
    fn test_load_missing_draft() {
        let (_dir, storage) = temp_storage();
        let result = block_on(storage.load("missing"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_hostile_id_is_sanitized() {
        let (_dir, storage) = temp_storage();
        let draft = Draft::Template(DocumentDraft::new("Lease"));

        block_on(storage.save("../escape", &draft)).unwrap();
        // The file landed inside the storage directory.
        let list = block_on(storage.list()).unwrap();
        assert_eq!(list, vec!["___escape".to_string()]);
    }

    #[test]
    fn test_delete_then_exists() {
        let (_dir, storage) = temp_storage();
        let draft = Draft::Template(DocumentDraft::new("Lease"));
        let id = draft.id().to_string();

        block_on(storage.save(&id, &draft)).unwrap();
        assert!(block_on(storage.exists(&id)).unwrap());

        block_on(storage.delete(&id)).unwrap();
        assert!(!block_on(storage.exists(&id)).unwrap());

        // Deleting again is fine.
        block_on(storage.delete(&id)).unwrap();
    }
}
