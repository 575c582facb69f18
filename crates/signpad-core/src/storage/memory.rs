//! In-memory storage implementation.

use super::{BoxFuture, Draft, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    drafts: RwLock<HashMap<String, Draft>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, draft: &Draft) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let draft = draft.clone();
        Box::pin(async move {
            let mut drafts = self
                .drafts
                .write()
                .map_err(|e| StorageError::Other(format!("lock error: {e}")))?;
            drafts.insert(id, draft);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Draft>> {
        let id = id.to_string();
        Box::pin(async move {
            let drafts = self
                .drafts
                .read()
                .map_err(|e| StorageError::Other(format!("lock error: {e}")))?;
            drafts.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut drafts = self
                .drafts
                .write()
                .map_err(|e| StorageError::Other(format!("lock error: {e}")))?;
            drafts.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let drafts = self
                .drafts
                .read()
                .map_err(|e| StorageError::Other(format!("lock error: {e}")))?;
            Ok(drafts.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let drafts = self
                .drafts
                .read()
                .map_err(|e| StorageError::Other(format!("lock error: {e}")))?;
            Ok(drafts.contains_key(&id))
        })
    }
}
