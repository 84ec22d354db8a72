use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::plugin_system::manifest::PluginManifest;
use crate::plugin_system::traits::PluginId;
use crate::storage::error::{StorageResult, StorageSystemError};
use crate::storage::provider::{PluginStorage, StoredPlugin};

#[derive(Debug)]
struct MemoryState {
    records: BTreeMap<PluginId, StoredPlugin>,
    next_id: PluginId,
}

/// Non-persistent storage; records live as long as the value
#[derive(Debug)]
pub struct MemoryPluginStorage {
    state: Mutex<MemoryState>,
}

impl MemoryPluginStorage {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                records: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryPluginStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginStorage for MemoryPluginStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn installed(&self) -> StorageResult<Vec<StorageResult<StoredPlugin>>> {
        Ok(self.lock().records.values().cloned().map(Ok).collect())
    }

    fn insert(&self, location: &str, manifest: &PluginManifest) -> StorageResult<StoredPlugin> {
        let mut state = self.lock();
        let record = StoredPlugin {
            id: state.next_id,
            location: location.to_string(),
            manifest: manifest.clone(),
        };
        state.next_id += 1;
        state.records.insert(record.id, record.clone());
        Ok(record)
    }

    fn remove(&self, id: PluginId) -> StorageResult<()> {
        match self.lock().records.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StorageSystemError::RecordNotFound(id)),
        }
    }

    fn clear(&self) -> StorageResult<()> {
        self.lock().records.clear();
        Ok(())
    }
}
